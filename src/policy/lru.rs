//! LRU (Least Recently Used) eviction policy state.
//!
//! Keys sit on a recency list with the most recently touched key at the
//! front. Hits and value overwrites both count as touches and splice the key
//! to the front; the victim is taken from the back.
//!
//! ```text
//!   front (most recent)                       back (least recent)
//!     ▼                                          ▼
//!   [touched last] ◄──► [ ... ] ◄──► [touched longest ago]  ── evict
//! ```
//!
//! | Operation       | Time | Effect on ordering                     |
//! |-----------------|------|----------------------------------------|
//! | `on_insert`     | O(1) | New key enters at the front            |
//! | `on_access`     | O(1) | Splices the key to the front           |
//! | `select_victim` | O(1) | Back of the list (least recent)        |
//! | `on_evict`      | O(1) | Unlinks the key                        |

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::{OrderList, SlotId};

/// Recency order over key-indexed list nodes, evicting the least recent.
#[derive(Debug)]
pub struct LruPolicy<K> {
    index: FxHashMap<K, SlotId>,
    order: OrderList<K>,
}

impl<K> LruPolicy<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty policy with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: OrderList::with_capacity(capacity),
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

    /// Records a brand-new key as the most recent.
    pub fn on_insert(&mut self, key: K) {
        debug_assert!(!self.index.contains_key(&key), "insert of tracked key");
        let id = self.order.push_front(key.clone());
        self.index.insert(key, id);
    }

    /// Records a touch (hit or overwrite), making `key` the most recent.
    pub fn on_access(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.order.move_to_front(id),
            None => false,
        }
    }

    /// Returns the key that would be evicted next: the least recently
    /// touched. Pure query; `None` only when the policy is empty.
    pub fn select_victim(&self) -> Option<K> {
        self.order.back().cloned()
    }

    /// Drops the bookkeeping for an evicted key.
    pub fn on_evict(&mut self, key: &K) {
        let id = self.index.remove(key);
        debug_assert!(id.is_some(), "evict of untracked key");
        if let Some(id) = id {
            self.order.remove(id);
        }
    }

    /// Keys in eviction order, least recently touched first.
    pub fn eviction_order(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.order.iter().cloned().collect();
        keys.reverse();
        keys
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.order.len());
        self.order.debug_validate_invariants();
        for key in self.order.iter() {
            assert!(self.index.contains_key(key));
        }
    }
}
