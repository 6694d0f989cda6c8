//! Key hashing: the pluggable strategy, the per-dictionary seed and the
//! default lane hash.

/// 128-bit per-dictionary seed handed to the hash strategy as two halves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Seed {
    /// Least significant half.
    pub k0: u64,
    /// Most significant half.
    pub k1: u64,
}

impl Seed {
    pub const ZERO: Seed = Seed { k0: 0, k1: 0 };

    pub const fn new(k0: u64, k1: u64) -> Self {
        Seed { k0, k1 }
    }

    pub const fn from_u128(v: u128) -> Self {
        Seed {
            k0: v as u64,
            k1: (v >> 64) as u64,
        }
    }

    pub const fn as_u128(self) -> u128 {
        ((self.k1 as u128) << 64) | self.k0 as u128
    }
}

/// Hash strategy over the raw bytes of a key.
///
/// Any `Fn(&[u8], u64, u64) -> u64` (bytes, seed low half, seed high half)
/// is a `KeyHasher`, so plain functions can be plugged in directly:
///
/// ```
/// use dense_dict::{Dictionary, HashFn};
///
/// fn xor_fold(bytes: &[u8], _k0: u64, _k1: u64) -> u64 {
///     bytes.iter().fold(0x8887_3830_983F_3138, |h, &b| h ^ b as u64)
/// }
///
/// let mut d: Dictionary<u64, f32, HashFn> = Dictionary::with_hasher(xor_fold);
/// d.put(3, 10.0);
/// assert_eq!(d.slot_of(&3), Some(3));
/// ```
pub trait KeyHasher {
    fn hash(&self, bytes: &[u8], seed: Seed) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8], u64, u64) -> u64,
{
    #[inline]
    fn hash(&self, bytes: &[u8], seed: Seed) -> u64 {
        self(bytes, seed.k0, seed.k1)
    }
}

/// Function-pointer hash strategy, convenient for naming dictionary types.
pub type HashFn = fn(&[u8], u64, u64) -> u64;

/// Default non-cryptographic hash: add/rotate/xor mixing over 8-byte
/// little-endian lanes with a byte-wise tail. The seed is ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LaneHash;

const LANE_INIT_A: u64 = 0x243F_6A88_85A3_08D3;
const LANE_INIT_B: u64 = 0x9E37_79B9_7F4A_7C15;

#[inline]
fn mix_lane(a: u64, b: u64, lane: u64) -> (u64, u64) {
    let a = a.rotate_left(5).wrapping_add(lane) ^ lane.rotate_right(17);
    let b = (b ^ a).rotate_left(29).wrapping_add(a);
    (a, b)
}

impl LaneHash {
    pub fn digest(bytes: &[u8]) -> u64 {
        let mut a = LANE_INIT_A ^ bytes.len() as u64;
        let mut b = LANE_INIT_B;

        let mut lanes = bytes.chunks_exact(8);
        for lane in lanes.by_ref() {
            let mut word = [0u8; 8];
            word.copy_from_slice(lane);
            (a, b) = mix_lane(a, b, u64::from_le_bytes(word));
        }
        for &byte in lanes.remainder() {
            a = (a ^ byte as u64).rotate_left(8).wrapping_add(b);
            b = b.rotate_left(11) ^ a;
        }

        // Finalize so the low bits used for bucket selection depend on
        // every input bit.
        for _ in 0..4 {
            a = a.wrapping_add(b);
            b = b.rotate_left(13) ^ a;
            a = a.rotate_left(32);
        }
        a ^ b
    }
}

impl KeyHasher for LaneHash {
    #[inline]
    fn hash(&self, bytes: &[u8], _seed: Seed) -> u64 {
        LaneHash::digest(bytes)
    }
}
