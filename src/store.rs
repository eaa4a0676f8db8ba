//! Entry storage for cache policies.
//!
//! The store owns key/value pairs and their per-key metadata (insertion
//! sequence, last-access tick, access count), while policies own eviction
//! order. Keeping the two apart means the policy modules never hold values
//! and the store never makes eviction decisions.
//!
//! A key is present in the store iff it is present in exactly one place in
//! the owning policy's ordering structures; the cache layer maintains that
//! synchronization. `remove` of an absent key therefore signals a bookkeeping
//! bug upstream, which callers guard with `debug_assert!`.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Per-key bookkeeping captured alongside the value.
///
/// Ticks come from the owning cache's logical clock, which advances on every
/// `get`/`put`; they are observational and never drive eviction directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    /// Logical tick at which the key was first inserted. Survives value
    /// overwrites.
    pub inserted_at: u64,
    /// Logical tick of the most recent hit or overwrite.
    pub last_access: u64,
    /// Number of times the entry was hit or overwritten, counting the
    /// initial insertion.
    pub access_count: u64,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    meta: EntryMeta,
}

/// Bounded key → (value, metadata) map with O(1) operations.
#[derive(Debug)]
pub struct EntryStore<K, V> {
    map: FxHashMap<K, Entry<V>>,
}

impl<K, V> EntryStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the store holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if `key` is stored. Never touches metadata.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the value for `key` without touching metadata.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|entry| &entry.value)
    }

    /// Returns the metadata snapshot for `key`.
    #[inline]
    pub fn meta(&self, key: &K) -> Option<EntryMeta> {
        self.map.get(key).map(|entry| entry.meta)
    }

    /// Inserts a brand-new entry. The caller must have established that the
    /// key is absent.
    pub fn insert(&mut self, key: K, value: V, tick: u64) {
        debug_assert!(!self.map.contains_key(&key), "insert of present key");
        self.map.insert(
            key,
            Entry {
                value,
                meta: EntryMeta {
                    inserted_at: tick,
                    last_access: tick,
                    access_count: 1,
                },
            },
        );
    }

    /// Overwrites the value of an existing entry, returning the old value.
    /// Insertion metadata survives; last-access and count advance.
    pub fn update_value(&mut self, key: &K, value: V, tick: u64) -> Option<V> {
        let entry = self.map.get_mut(key)?;
        entry.meta.last_access = tick;
        entry.meta.access_count += 1;
        Some(std::mem::replace(&mut entry.value, value))
    }

    /// Records a hit on an existing entry.
    pub fn touch(&mut self, key: &K, tick: u64) -> bool {
        match self.map.get_mut(key) {
            Some(entry) => {
                entry.meta.last_access = tick;
                entry.meta.access_count += 1;
                true
            }
            None => false,
        }
    }

    /// Removes an entry and returns its value. Absence here means the policy
    /// and store went out of sync; callers treat `None` as a bug.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key).map(|entry| entry.value)
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut store = EntryStore::with_capacity(4);
        store.insert(1, "one", 0);
        assert_eq!(store.get(&1), Some(&"one"));
        assert_eq!(store.get(&2), None);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&1));
    }

    #[test]
    fn insert_records_metadata() {
        let mut store = EntryStore::with_capacity(4);
        store.insert(1, "one", 7);
        let meta = store.meta(&1).unwrap();
        assert_eq!(meta.inserted_at, 7);
        assert_eq!(meta.last_access, 7);
        assert_eq!(meta.access_count, 1);
    }

    #[test]
    fn update_value_keeps_insertion_tick() {
        let mut store = EntryStore::with_capacity(4);
        store.insert(1, "one", 3);
        assert_eq!(store.update_value(&1, "uno", 9), Some("one"));

        let meta = store.meta(&1).unwrap();
        assert_eq!(meta.inserted_at, 3);
        assert_eq!(meta.last_access, 9);
        assert_eq!(meta.access_count, 2);
        assert_eq!(store.get(&1), Some(&"uno"));
    }

    #[test]
    fn update_value_of_absent_key_returns_none() {
        let mut store: EntryStore<u32, &str> = EntryStore::with_capacity(4);
        assert_eq!(store.update_value(&1, "x", 0), None);
    }

    #[test]
    fn touch_advances_access_metadata() {
        let mut store = EntryStore::with_capacity(4);
        store.insert(1, "one", 0);
        assert!(store.touch(&1, 5));
        assert!(!store.touch(&2, 5));

        let meta = store.meta(&1).unwrap();
        assert_eq!(meta.last_access, 5);
        assert_eq!(meta.access_count, 2);
    }

    #[test]
    fn remove_returns_value_once() {
        let mut store = EntryStore::with_capacity(4);
        store.insert(1, "one", 0);
        assert_eq!(store.remove(&1), Some("one"));
        assert_eq!(store.remove(&1), None);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut store = EntryStore::with_capacity(4);
        store.insert(1, "one", 0);
        store.insert(2, "two", 1);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.meta(&1), None);
    }
}
