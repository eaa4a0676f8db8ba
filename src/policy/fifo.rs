//! FIFO (First-In, First-Out) eviction policy state.
//!
//! Keys queue up in insertion order and leave in insertion order. Access
//! history is ignored entirely: a hit never reorders the queue, and a value
//! overwrite keeps the key's original position. That makes FIFO the most
//! predictable of the policies: the victim is always the key that has been
//! resident longest.
//!
//! | Operation       | Time | Effect on ordering                    |
//! |-----------------|------|---------------------------------------|
//! | `on_insert`     | O(1) | Appends the key to the queue tail     |
//! | `on_access`     | O(1) | None (reads never reorder)            |
//! | `select_victim` | O(1) | Queue head (oldest insertion)         |
//! | `on_evict`      | O(1) | Unlinks the key from the queue        |

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::{OrderList, SlotId};

/// Insertion-order queue over key-indexed list nodes.
#[derive(Debug)]
pub struct FifoPolicy<K> {
    index: FxHashMap<K, SlotId>,
    queue: OrderList<K>,
}

impl<K> FifoPolicy<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty policy with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            queue: OrderList::with_capacity(capacity),
        }
    }

    /// Returns the number of tracked keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no keys are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records a brand-new key at the tail of the insertion queue.
    pub fn on_insert(&mut self, key: K) {
        debug_assert!(!self.index.contains_key(&key), "insert of tracked key");
        let id = self.queue.push_back(key.clone());
        self.index.insert(key, id);
    }

    /// Records a hit. FIFO ordering is insensitive to access history, so
    /// this is a no-op beyond the presence check.
    pub fn on_access(&mut self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the key that would be evicted next: the oldest insertion.
    /// Pure query; `None` only when the policy is empty.
    pub fn select_victim(&self) -> Option<K> {
        self.queue.front().cloned()
    }

    /// Drops the bookkeeping for an evicted key.
    pub fn on_evict(&mut self, key: &K) {
        let id = self.index.remove(key);
        debug_assert!(id.is_some(), "evict of untracked key");
        if let Some(id) = id {
            self.queue.remove(id);
        }
    }

    /// Keys in eviction order, oldest insertion first.
    pub fn eviction_order(&self) -> Vec<K> {
        self.queue.iter().cloned().collect()
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.index.clear();
        self.queue.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.queue.len());
        self.queue.debug_validate_invariants();
        for key in self.queue.iter() {
            assert!(self.index.contains_key(key));
        }
    }
}
