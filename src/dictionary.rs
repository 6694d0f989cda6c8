//! Dictionary: dense entry store indexed by an open-addressing bucket table.
//!
//! Entries live contiguously in a [`Vector`] and are removed with
//! `swap_remove`, so the bucket pointing at the moved (previously last)
//! entry must be retargeted before the move. Buckets hold no back-reference
//! to their entry, so that bucket is found again by re-hashing the last
//! entry's key.

use crate::bucket_table::{Bucket, BucketTable, Probe};
use crate::config::DictConfig;
use crate::error::ConfigError;
use crate::hashing::{KeyHasher, LaneHash, Seed};
use crate::vector::Vector;
use bytemuck::NoUninit;
use core::fmt;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Keys compare by their byte representation.
#[inline]
fn same_key<K: NoUninit>(a: &K, b: &K) -> bool {
    bytemuck::bytes_of(a) == bytemuck::bytes_of(b)
}

/// Hash dictionary keyed on plain-old-data keys.
///
/// ```
/// use dense_dict::Dictionary;
///
/// let mut d: Dictionary<u32, &str> = Dictionary::new();
/// assert_eq!(d.put(1, "one"), None);
/// assert_eq!(d.put(1, "uno"), Some("one"));
/// assert_eq!(d.get(&1), Some(&"uno"));
/// assert!(d.delete(&1));
/// assert!(!d.delete(&1));
/// assert_eq!(d.get(&1), None);
/// ```
pub struct Dictionary<K, V, H = LaneHash> {
    entries: Vector<Entry<K, V>>,
    table: BucketTable,
    seed: Seed,
    hasher: H,
}

impl<K, V> Dictionary<K, V>
where
    K: NoUninit,
{
    /// Empty dictionary with 8 buckets, room for 8 entries and the
    /// default hash.
    pub fn new() -> Self {
        Self::with_hasher(LaneHash)
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: NoUninit,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> Dictionary<K, V, H>
where
    K: NoUninit,
    H: KeyHasher,
{
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_valid_config(DictConfig::default(), hasher)
    }

    pub fn with_config(config: DictConfig, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, hasher))
    }

    fn from_valid_config(config: DictConfig, hasher: H) -> Self {
        Self {
            entries: Vector::with_capacity(config.initial_entries),
            table: BucketTable::with_capacity(config.initial_buckets),
            seed: config.seed,
            hasher,
        }
    }

    #[inline]
    fn make_hash(&self, key: &K) -> u64 {
        self.hasher.hash(bytemuck::bytes_of(key), self.seed)
    }

    fn find_slot(&self, key: &K) -> Option<usize> {
        let hash = self.make_hash(key);
        let entries = &self.entries;
        self.table
            .find(hash, |offset| same_key(&entries[offset].key, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry store capacity.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn bucket_capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Buckets counted toward the load factor: occupied plus tombstoned
    /// since the last rehash.
    pub fn used_buckets(&self) -> usize {
        self.table.used()
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Raw bucket at `slot`, or `None` past the table's end.
    pub fn bucket(&self, slot: usize) -> Option<Bucket> {
        self.table.bucket(slot)
    }

    /// Bucket slot currently indexing `key`.
    pub fn slot_of(&self, key: &K) -> Option<usize> {
        self.find_slot(key)
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        let entries = &self.entries;
        match self
            .table
            .find_or_vacant(hash, |offset| same_key(&entries[offset].key, &key))
        {
            Probe::Found(slot) => {
                let offset = self.table.offset(slot);
                Some(core::mem::replace(&mut self.entries[offset].value, value))
            }
            Probe::Vacant(slot) => {
                // The bucket points at the entry about to be appended; a
                // rebuild only moves bucket metadata so the offset survives.
                self.table.fill(slot, hash, self.entries.len());
                if self.table.needs_grow() {
                    self.table.grow();
                }
                self.entries.push(Entry { key, value });
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let slot = self.find_slot(key)?;
        Some(&self.entries[self.table.offset(slot)].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.find_slot(key)?;
        let offset = self.table.offset(slot);
        Some(&mut self.entries[offset].value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let slot = self.find_slot(key)?;
        let entry = &self.entries[self.table.offset(slot)];
        Some((&entry.key, &entry.value))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_slot(key).is_some()
    }

    /// Remove `key`, returning whether it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Remove `key` and return its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.find_slot(key)?;
        let offset = self.table.offset(slot);

        // Retarget the last entry's bucket to the offset it is about to be
        // moved into. When the removed entry is the last one this rewrites
        // `slot` with its own offset.
        let last = self.entries.len() - 1;
        let last_key = self.entries[last].key;
        let last_hash = self.make_hash(&last_key);
        let last_slot = self
            .table
            .find(last_hash, |o| o == last)
            .expect("last entry must be indexed by an occupied bucket");
        self.table.retarget(last_slot, offset);

        let removed = self.entries.swap_remove(offset);
        self.table.set_tombstone(slot);
        Some(removed.value)
    }

    /// Drop every entry. Both capacities are kept and all buckets become
    /// empty.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.table.reset();
    }

    /// Entries in storage order, which is unrelated to insertion order once
    /// anything has been removed.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.entries.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

/// Iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, H> IntoIterator for &'a Dictionary<K, V, H>
where
    K: NoUninit,
    H: KeyHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> Extend<(K, V)> for Dictionary<K, V, H>
where
    K: NoUninit,
    H: KeyHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for Dictionary<K, V, H>
where
    K: NoUninit,
    H: KeyHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut d = Self::with_hasher(H::default());
        d.extend(iter);
        d
    }
}

impl<K, V, H> Clone for Dictionary<K, V, H>
where
    K: Clone,
    V: Clone,
    H: Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            table: self.table.clone(),
            seed: self.seed,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, H> fmt::Debug for Dictionary<K, V, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}
