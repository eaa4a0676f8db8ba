//! Bounded cache binding one eviction policy to one entry store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        PolicyCache<K, V>                         │
//! │                                                                  │
//! │   get(&k) ──┬─► counters (accesses, hits, misses)                │
//! │             ├─► PolicyState::on_access   (ordering update)       │
//! │             └─► EntryStore::touch + get  (value + metadata)      │
//! │                                                                  │
//! │   put(k, v) ─► present?  update value + policy overwrite rule    │
//! │              ─► full?    select_victim → on_evict → store remove │
//! │              ─► then     store insert + policy on_insert         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The eviction sequence runs to completion *before* the new insertion, so
//! `len() <= capacity` holds at every point a caller can observe. A key is
//! resident in the store iff the policy tracks it in exactly one place;
//! `check_invariants` verifies that correspondence.
//!
//! ## Counters
//!
//! Only `get` moves the counters: a hit increments `accesses` and `hits`, a
//! miss increments `accesses` and `misses`, and `hits + misses == accesses`
//! always. `put` updates ordering and metadata but never the counters, and
//! `contains` touches nothing at all.
//!
//! The cache is single-threaded: no operation suspends, blocks, or takes locks.
//! Run one instance per thread, or layer an external lock around the whole
//! cache if it must be shared.

use std::hash::Hash;

use crate::error::InvariantError;
use crate::policy::{PolicyKind, PolicyState};
use crate::stats::{self, CacheStats};
use crate::store::{EntryMeta, EntryStore};

/// Bounded key→value cache with a pluggable eviction policy.
///
/// # Example
///
/// ```
/// use cachelab::cache::PolicyCache;
/// use cachelab::policy::PolicyKind;
///
/// let mut cache = PolicyCache::new(PolicyKind::Lru, 3);
/// cache.put(1, "one");
/// cache.put(2, "two");
/// cache.put(3, "three");
///
/// cache.get(&1); // key 1 becomes most recent
/// cache.put(4, "four"); // evicts key 2, the least recent
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// assert_eq!(cache.stats().hit_rate, 100.0);
/// ```
#[derive(Debug)]
pub struct PolicyCache<K, V> {
    capacity: usize,
    store: EntryStore<K, V>,
    policy: PolicyState<K>,
    accesses: u64,
    hits: u64,
    misses: u64,
    tick: u64,
}

impl<K, V> PolicyCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache running `kind` with the given capacity.
    ///
    /// Capacity 0 is legal and means "no caching": every `put` is a no-op
    /// and every `get` misses.
    pub fn new(kind: PolicyKind, capacity: usize) -> Self {
        Self {
            capacity,
            store: EntryStore::with_capacity(capacity),
            policy: PolicyState::new(kind, capacity),
            accesses: 0,
            hits: 0,
            misses: 0,
            tick: 0,
        }
    }

    /// Returns which policy this cache runs.
    #[inline]
    pub fn kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no entries are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns `true` if the cache is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.store.len() >= self.capacity
    }

    /// Looks up `key`, counting the access and updating policy ordering on
    /// a hit. A miss has no side effect on the store.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.accesses += 1;
        self.tick += 1;
        if self.store.contains(key) {
            self.hits += 1;
            self.policy.on_access(key);
            self.store.touch(key, self.tick);
            self.store.get(key)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Inserts or overwrites `key`.
    ///
    /// - Present key: the value is replaced and the overwrite counts as an
    ///   access under every policy except FIFO, which keeps the key's
    ///   insertion position.
    /// - Absent key with a full cache: the policy's victim is evicted first,
    ///   then the new entry is inserted in the fresh position.
    /// - Capacity 0: complete no-op.
    pub fn put(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.tick += 1;

        if self.store.contains(&key) {
            self.store.update_value(&key, value, self.tick);
            self.policy.on_overwrite(&key);
            return;
        }

        if self.store.len() >= self.capacity {
            if let Some(victim) = self.policy.select_victim() {
                self.policy.on_evict(&victim);
                let evicted = self.store.remove(&victim);
                debug_assert!(evicted.is_some(), "victim missing from store");
            }
        }

        self.store.insert(key.clone(), value, self.tick);
        self.policy.on_insert(key);

        #[cfg(debug_assertions)]
        self.policy.debug_validate_invariants();
    }

    /// Returns `true` if `key` is resident. Never reorders and never counts
    /// as an access.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    /// Reads a resident value without counting an access or reordering.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    /// Non-mutating preview of the next eviction victim; `None` when empty.
    pub fn peek_victim(&self) -> Option<K> {
        self.policy.select_victim()
    }

    /// Empties the cache and zeroes the counters.
    pub fn clear(&mut self) {
        self.store.clear();
        self.policy.clear();
        self.accesses = 0;
        self.hits = 0;
        self.misses = 0;
        self.tick = 0;
    }

    /// Zeroes the counters without touching resident entries.
    pub fn reset_stats(&mut self) {
        self.accesses = 0;
        self.hits = 0;
        self.misses = 0;
    }

    /// Snapshot of the cache's counters and gauges.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            policy: self.kind(),
            capacity: self.capacity,
            len: self.len(),
            accesses: self.accesses,
            hits: self.hits,
            misses: self.misses,
            hit_rate: stats::hit_rate(self.hits, self.accesses),
        }
    }

    /// Resident keys in the order the policy would evict them, victim first.
    pub fn eviction_order(&self) -> Vec<K> {
        self.policy.eviction_order()
    }

    /// Access frequency of `key`; `None` unless this is an LFU cache
    /// tracking the key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.policy.frequency(key)
    }

    /// Frequency bucket snapshot; `None` unless this is an LFU cache.
    pub fn keys_by_frequency(&self) -> Option<Vec<(u64, Vec<K>)>> {
        self.policy.keys_by_frequency()
    }

    /// Metadata snapshot for a resident key.
    pub fn meta(&self, key: &K) -> Option<EntryMeta> {
        self.store.meta(key)
    }

    /// Verifies the store/policy correspondence and counter arithmetic.
    ///
    /// A correct build never fails this; any error indicates a bookkeeping
    /// bug and should be treated as fatal.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.store.len(),
                self.capacity
            )));
        }
        if self.store.len() != self.policy.len() {
            return Err(InvariantError::new(format!(
                "store holds {} entries but policy tracks {}",
                self.store.len(),
                self.policy.len()
            )));
        }
        if self.hits + self.misses != self.accesses {
            return Err(InvariantError::new(format!(
                "hits {} + misses {} != accesses {}",
                self.hits, self.misses, self.accesses
            )));
        }
        let order = self.policy.eviction_order();
        if order.len() != self.store.len() {
            return Err(InvariantError::new(
                "policy ordering does not cover every entry",
            ));
        }
        for key in &order {
            if !self.store.contains(key) {
                return Err(InvariantError::new("policy tracks a key the store lost"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // Basic operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: PolicyCache<u32, &str> = PolicyCache::new(PolicyKind::Lru, 10);
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.kind(), PolicyKind::Lru);
            assert_eq!(cache.peek_victim(), None);
        }

        #[test]
        fn put_and_get_round_trip() {
            let mut cache = PolicyCache::new(PolicyKind::Fifo, 10);
            cache.put(1, "one");
            assert_eq!(cache.get(&1), Some(&"one"));
            assert_eq!(cache.get(&2), None);
        }

        #[test]
        fn overwrite_replaces_value_in_place() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 10);
            cache.put(1, "old");
            cache.put(1, "new");
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&1), Some(&"new"));
        }

        #[test]
        fn contains_counts_nothing() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 10);
            cache.put(1, "one");
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
            assert_eq!(cache.stats().accesses, 0);
        }

        #[test]
        fn miss_does_not_populate_store() {
            let mut cache: PolicyCache<u32, &str> = PolicyCache::new(PolicyKind::Lfu, 10);
            assert_eq!(cache.get(&7), None);
            assert!(cache.is_empty());
            assert_eq!(cache.stats().misses, 1);
        }
    }

    // ==============================================
    // Policy-specific eviction through the cache
    // ==============================================

    mod eviction_behavior {
        use super::*;

        #[test]
        fn size_never_exceeds_capacity() {
            for kind in PolicyKind::all() {
                let mut cache = PolicyCache::new(kind, 3);
                for i in 0..20u32 {
                    cache.put(i, i);
                    assert!(cache.len() <= 3, "{kind} overflowed");
                    cache.check_invariants().unwrap();
                }
            }
        }

        #[test]
        fn fifo_overwrite_keeps_insertion_position() {
            let mut cache = PolicyCache::new(PolicyKind::Fifo, 3);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.put(3, "three");

            cache.put(1, "one-rewritten");
            cache.put(4, "four");

            // Key 1 was still the oldest insertion despite the overwrite.
            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
            assert!(cache.contains(&4));
        }

        #[test]
        fn lru_evicts_least_recently_touched() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 3);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.put(3, "three");

            cache.get(&1);
            cache.put(4, "four");

            assert!(!cache.contains(&2));
            assert_eq!(cache.get(&1), Some(&"one"));
            assert_eq!(cache.get(&2), None);
        }

        #[test]
        fn mru_evicts_most_recently_touched() {
            let mut cache = PolicyCache::new(PolicyKind::Mru, 3);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.put(3, "three");

            cache.get(&1);
            cache.put(4, "four");

            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
            assert!(cache.contains(&4));
        }

        #[test]
        fn mru_overwrite_marks_next_victim() {
            let mut cache = PolicyCache::new(PolicyKind::Mru, 3);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.put(3, "three");

            cache.put(2, "two-rewritten");
            assert_eq!(cache.peek_victim(), Some(2));

            cache.put(4, "four");
            assert!(!cache.contains(&2));
        }

        #[test]
        fn lfu_evicts_lowest_frequency() {
            let mut cache = PolicyCache::new(PolicyKind::Lfu, 3);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.put(3, "three");

            cache.get(&1);
            cache.get(&1);
            cache.get(&2);

            assert_eq!(cache.frequency(&1), Some(3));
            assert_eq!(cache.frequency(&2), Some(2));
            assert_eq!(cache.frequency(&3), Some(1));

            cache.put(4, "four");
            assert!(!cache.contains(&3));
            assert!(cache.contains(&1));
            assert!(cache.contains(&2));
        }

        #[test]
        fn lfu_tie_breaks_by_bucket_age() {
            let mut cache = PolicyCache::new(PolicyKind::Lfu, 2);
            cache.put(1, "one");
            cache.put(2, "two");

            // Both at frequency 1; key 1 entered the bucket first.
            cache.put(3, "three");
            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
        }

        #[test]
        fn lfu_overwrite_counts_as_access() {
            let mut cache = PolicyCache::new(PolicyKind::Lfu, 3);
            cache.put(1, "one");
            cache.put(1, "one-rewritten");
            assert_eq!(cache.frequency(&1), Some(2));
        }

        #[test]
        fn eviction_order_exposes_policy_view() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 3);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.put(3, "three");
            cache.get(&1);
            assert_eq!(cache.eviction_order(), vec![2, 3, 1]);
            assert_eq!(cache.peek_victim(), Some(2));
        }
    }

    // ==============================================
    // Counters and stats
    // ==============================================

    mod counters {
        use super::*;

        #[test]
        fn hit_rate_arithmetic_is_exact() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 3);
            cache.put(1, "one");

            cache.get(&1); // hit
            cache.get(&1); // hit
            cache.get(&2); // miss
            cache.get(&3); // miss

            let stats = cache.stats();
            assert_eq!(stats.accesses, 4);
            assert_eq!(stats.hits, 2);
            assert_eq!(stats.misses, 2);
            assert_eq!(stats.hit_rate, 50.0);
        }

        #[test]
        fn hit_rate_is_zero_before_any_access() {
            let cache: PolicyCache<u32, &str> = PolicyCache::new(PolicyKind::Fifo, 3);
            assert_eq!(cache.stats().hit_rate, 0.0);
        }

        #[test]
        fn put_never_moves_counters() {
            let mut cache = PolicyCache::new(PolicyKind::Lfu, 3);
            cache.put(1, "one");
            cache.put(1, "rewritten");
            cache.put(2, "two");
            assert_eq!(cache.stats().accesses, 0);
        }

        #[test]
        fn reset_stats_keeps_contents() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 3);
            cache.put(1, "one");
            cache.get(&1);
            cache.get(&2);

            cache.reset_stats();
            let stats = cache.stats();
            assert_eq!(stats.accesses, 0);
            assert_eq!(stats.hits, 0);
            assert_eq!(stats.misses, 0);
            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&1));
        }

        #[test]
        fn metadata_tracks_access_history() {
            let mut cache = PolicyCache::new(PolicyKind::Lru, 3);
            cache.put(1, "one");
            let inserted = cache.meta(&1).unwrap();
            cache.get(&1);
            let touched = cache.meta(&1).unwrap();

            assert_eq!(inserted.inserted_at, touched.inserted_at);
            assert!(touched.last_access > inserted.last_access);
            assert_eq!(touched.access_count, 2);
        }
    }

    // ==============================================
    // Edge cases
    // ==============================================

    mod edge_cases {
        use super::*;

        #[test]
        fn zero_capacity_never_stores() {
            for kind in PolicyKind::all() {
                let mut cache = PolicyCache::new(kind, 0);
                cache.put(1, "one");
                cache.put(2, "two");
                assert_eq!(cache.len(), 0, "{kind}");
                assert_eq!(cache.get(&1), None);
                assert_eq!(cache.peek_victim(), None);
                cache.check_invariants().unwrap();
            }
        }

        #[test]
        fn zero_capacity_still_counts_misses() {
            let mut cache: PolicyCache<u32, &str> = PolicyCache::new(PolicyKind::Lru, 0);
            cache.get(&1);
            cache.get(&2);
            let stats = cache.stats();
            assert_eq!(stats.accesses, 2);
            assert_eq!(stats.misses, 2);
        }

        #[test]
        fn capacity_one_churns_correctly() {
            for kind in PolicyKind::all() {
                let mut cache = PolicyCache::new(kind, 1);
                cache.put(1, "one");
                cache.put(2, "two");
                assert_eq!(cache.len(), 1, "{kind}");
                assert!(!cache.contains(&1));
                assert_eq!(cache.get(&2), Some(&"two"));
                cache.check_invariants().unwrap();
            }
        }

        #[test]
        fn clear_resets_everything() {
            let mut cache = PolicyCache::new(PolicyKind::Lfu, 3);
            cache.put(1, "one");
            cache.get(&1);
            cache.get(&9);

            cache.clear();
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.peek_victim(), None);
            let stats = cache.stats();
            assert_eq!(stats.accesses, 0);
            assert_eq!(stats.hits, 0);
            assert_eq!(stats.misses, 0);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn refill_after_clear_behaves_fresh() {
            let mut cache = PolicyCache::new(PolicyKind::Fifo, 2);
            cache.put(1, "one");
            cache.put(2, "two");
            cache.clear();

            cache.put(3, "three");
            cache.put(4, "four");
            cache.put(5, "five");
            assert!(!cache.contains(&3));
            assert_eq!(cache.eviction_order(), vec![4, 5]);
        }
    }

    // ==============================================
    // Invariant checking
    // ==============================================

    #[test]
    fn invariants_hold_under_mixed_churn() {
        for kind in PolicyKind::all() {
            let mut cache = PolicyCache::new(kind, 5);
            for i in 0..100u32 {
                cache.put(i % 13, i);
                cache.get(&(i % 7));
                if i % 11 == 0 {
                    cache.put(i % 13, i + 1);
                }
            }
            cache.check_invariants().unwrap();
            assert!(cache.len() <= 5);
        }
    }
}
