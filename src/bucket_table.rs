//! BucketTable: open-addressing index from hashes to entry offsets.
//!
//! Each bucket packs its state into the index word: `0` is empty, `1` is
//! a tombstone, and anything from `2` up is an occupied bucket pointing at
//! entry offset `index - 2`. Probing is linear with wraparound starting
//! at `hash mod capacity`; capacity is always a power of two.
//!
//! `used` counts every bucket that ever left the empty state, tombstones
//! included, and drives growth. Only a rebuild resets it to the number of
//! occupied buckets.

use crate::error::AllocError;

const EMPTY: usize = 0;
const TOMBSTONE: usize = 1;
const OFFSET_BIAS: usize = 2;

/// One slot of the index table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    hash: u64,
    index: usize,
}

/// Decoded view of a bucket's index word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BucketState {
    Empty,
    Tombstone,
    /// Points at this offset in the entry store.
    Occupied(usize),
}

impl Bucket {
    /// Stored hash. Stale for tombstones; zero for never-used buckets.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn state(&self) -> BucketState {
        match self.index {
            EMPTY => BucketState::Empty,
            TOMBSTONE => BucketState::Tombstone,
            n => BucketState::Occupied(n - OFFSET_BIAS),
        }
    }
}

/// Outcome of an insertion probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// Occupied bucket holding the key.
    Found(usize),
    /// Key absent; insert here (first tombstone on the chain, else the
    /// empty bucket that ended it).
    Vacant(usize),
}

#[derive(Clone, Debug)]
pub(crate) struct BucketTable {
    buckets: Box<[Bucket]>,
    used: usize,
}

impl BucketTable {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        assert!(
            cap.is_power_of_two(),
            "bucket capacity must be a power of two, got {}",
            cap
        );
        Self {
            buckets: vec![Bucket::default(); cap].into_boxed_slice(),
            used: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Occupied plus tombstoned buckets since the last rebuild.
    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub(crate) fn bucket(&self, slot: usize) -> Option<Bucket> {
        self.buckets.get(slot).copied()
    }

    /// Entry offset of an occupied bucket.
    #[inline]
    pub(crate) fn offset(&self, slot: usize) -> usize {
        match self.buckets[slot].state() {
            BucketState::Occupied(offset) => offset,
            other => panic!("bucket {} is not occupied ({:?})", slot, other),
        }
    }

    /// Slots visited from `hash`'s home bucket, each once.
    fn probe_seq(&self, hash: u64) -> impl Iterator<Item = usize> {
        let mask = self.capacity() - 1;
        let home = (hash & mask as u64) as usize;
        (0..self.capacity()).map(move |step| (home + step) & mask)
    }

    /// Find the occupied bucket with `hash` whose entry satisfies
    /// `is_match(offset)`. Tombstones never stop the probe.
    pub(crate) fn find<F>(&self, hash: u64, mut is_match: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        for slot in self.probe_seq(hash) {
            let bucket = &self.buckets[slot];
            match bucket.state() {
                BucketState::Empty => return None,
                BucketState::Tombstone => continue,
                BucketState::Occupied(offset) => {
                    if bucket.hash == hash && is_match(offset) {
                        return Some(slot);
                    }
                }
            }
        }
        None
    }

    /// Like [`find`](Self::find), but on a miss reports where the key
    /// should go.
    ///
    /// A tombstone does not end the search: the first one passed is only
    /// remembered, and the scan continues to an empty bucket. Stopping at
    /// the tombstone would insert a second entry for a key that lives
    /// further along the chain, and deleting one copy would then expose
    /// the stale one. The remembered tombstone is reused on a miss.
    pub(crate) fn find_or_vacant<F>(&self, hash: u64, mut is_match: F) -> Probe
    where
        F: FnMut(usize) -> bool,
    {
        let mut first_tombstone = None;
        for slot in self.probe_seq(hash) {
            let bucket = &self.buckets[slot];
            match bucket.state() {
                BucketState::Empty => return Probe::Vacant(first_tombstone.unwrap_or(slot)),
                BucketState::Tombstone => {
                    first_tombstone.get_or_insert(slot);
                }
                BucketState::Occupied(offset) => {
                    if bucket.hash == hash && is_match(offset) {
                        return Probe::Found(slot);
                    }
                }
            }
        }
        match first_tombstone {
            Some(slot) => Probe::Vacant(slot),
            None => unreachable!("bucket table has no vacant slot"),
        }
    }

    /// Occupy a vacant `slot`. Only a previously empty bucket counts
    /// toward `used`.
    pub(crate) fn fill(&mut self, slot: usize, hash: u64, offset: usize) {
        let bucket = &mut self.buckets[slot];
        debug_assert!(!matches!(bucket.state(), BucketState::Occupied(_)));
        if bucket.index == EMPTY {
            self.used += 1;
        }
        *bucket = Bucket {
            hash,
            index: offset + OFFSET_BIAS,
        };
    }

    /// Point an occupied bucket at a different entry offset.
    #[inline]
    pub(crate) fn retarget(&mut self, slot: usize, offset: usize) {
        debug_assert!(matches!(self.buckets[slot].state(), BucketState::Occupied(_)));
        self.buckets[slot].index = offset + OFFSET_BIAS;
    }

    #[inline]
    pub(crate) fn set_tombstone(&mut self, slot: usize) {
        self.buckets[slot].index = TOMBSTONE;
    }

    /// Load factor of 3/4, counting tombstones.
    #[inline]
    pub(crate) fn needs_grow(&self) -> bool {
        self.used * 4 >= self.capacity() * 3
    }

    /// Rebuild at twice the capacity from the stored hashes. Tombstones are
    /// dropped and `used` becomes the number of occupied buckets.
    pub(crate) fn grow(&mut self) {
        let new_cap = self
            .capacity()
            .checked_mul(2)
            .unwrap_or_else(|| AllocError::CapacityOverflow.fatal());
        let mut next = Self::with_capacity(new_cap);
        for bucket in self.buckets.iter() {
            if let BucketState::Occupied(_) = bucket.state() {
                next.place(*bucket);
            }
        }
        log::debug!(
            "bucket table rehashed {} -> {} ({} live, {} tombstones reclaimed)",
            self.capacity(),
            new_cap,
            next.used,
            self.used - next.used
        );
        *self = next;
    }

    /// Insert into the first empty bucket on `bucket.hash`'s chain. Only
    /// valid on a table without tombstones.
    fn place(&mut self, bucket: Bucket) {
        for slot in self.probe_seq(bucket.hash) {
            if self.buckets[slot].index == EMPTY {
                self.buckets[slot] = bucket;
                self.used += 1;
                return;
            }
        }
        unreachable!("rebuilt bucket table overflowed");
    }

    /// Empty every bucket, keeping the capacity.
    pub(crate) fn reset(&mut self) {
        self.buckets.fill(Bucket::default());
        self.used = 0;
    }
}
