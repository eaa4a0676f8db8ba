//! Eviction policy variants and their common dispatch surface.
//!
//! Each policy module owns one ordering discipline:
//!
//! | Variant | Victim                         | Effect of a hit / overwrite      |
//! |---------|--------------------------------|----------------------------------|
//! | FIFO    | Oldest insertion               | None; reads never reorder        |
//! | LRU     | Least recently touched         | Splice to the recency front      |
//! | LFU     | Lowest frequency, oldest tie   | Frequency + 1, new bucket tail   |
//! | MRU     | Most recently touched          | Splice to the recency front      |
//!
//! [`PolicyState`] is the tagged union the cache layer programs against: one
//! `match` per operation instead of four unrelated cache types, so capacity
//! enforcement, counters, and the eviction sequence are written exactly once.
//! Policies never call back into the cache; control flows strictly downward.

pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod mru;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::UnknownPolicy;
use crate::policy::fifo::FifoPolicy;
use crate::policy::lfu::LfuPolicy;
use crate::policy::lru::LruPolicy;
use crate::policy::mru::MruPolicy;

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// First In, First Out: evict the oldest insertion.
    Fifo,
    /// Least Recently Used: evict the coldest by recency.
    Lru,
    /// Least Frequently Used: evict the coldest by access count.
    Lfu,
    /// Most Recently Used: evict the hottest by recency.
    Mru,
}

impl PolicyKind {
    /// Canonical policy name, used as the registry routing key.
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
            PolicyKind::Mru => "MRU",
        }
    }

    /// All policies in canonical order.
    pub fn all() -> [PolicyKind; 4] {
        [
            PolicyKind::Fifo,
            PolicyKind::Lru,
            PolicyKind::Lfu,
            PolicyKind::Mru,
        ]
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIFO" => Ok(PolicyKind::Fifo),
            "LRU" => Ok(PolicyKind::Lru),
            "LFU" => Ok(PolicyKind::Lfu),
            "MRU" => Ok(PolicyKind::Mru),
            other => Err(UnknownPolicy::new(other)),
        }
    }
}

/// Tagged union over the four policy states, dispatching the common
/// capability set (`on_insert` / `on_access` / `select_victim` / `on_evict`)
/// through a single interface.
#[derive(Debug)]
pub enum PolicyState<K> {
    Fifo(FifoPolicy<K>),
    Lru(LruPolicy<K>),
    Lfu(LfuPolicy<K>),
    Mru(MruPolicy<K>),
}

impl<K> PolicyState<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates the policy state for `kind` with reserved capacity.
    pub fn new(kind: PolicyKind, capacity: usize) -> Self {
        match kind {
            PolicyKind::Fifo => PolicyState::Fifo(FifoPolicy::with_capacity(capacity)),
            PolicyKind::Lru => PolicyState::Lru(LruPolicy::with_capacity(capacity)),
            PolicyKind::Lfu => PolicyState::Lfu(LfuPolicy::with_capacity(capacity)),
            PolicyKind::Mru => PolicyState::Mru(MruPolicy::with_capacity(capacity)),
        }
    }

    /// Returns which policy variant this state implements.
    pub fn kind(&self) -> PolicyKind {
        match self {
            PolicyState::Fifo(_) => PolicyKind::Fifo,
            PolicyState::Lru(_) => PolicyKind::Lru,
            PolicyState::Lfu(_) => PolicyKind::Lfu,
            PolicyState::Mru(_) => PolicyKind::Mru,
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        match self {
            PolicyState::Fifo(p) => p.len(),
            PolicyState::Lru(p) => p.len(),
            PolicyState::Lfu(p) => p.len(),
            PolicyState::Mru(p) => p.len(),
        }
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records a brand-new key, always in the "fresh" position for the
    /// variant (queue tail, recency front, or frequency 1).
    pub fn on_insert(&mut self, key: K) {
        match self {
            PolicyState::Fifo(p) => p.on_insert(key),
            PolicyState::Lru(p) => p.on_insert(key),
            PolicyState::Lfu(p) => p.on_insert(key),
            PolicyState::Mru(p) => p.on_insert(key),
        }
    }

    /// Records a hit on a resident key.
    pub fn on_access(&mut self, key: &K) -> bool {
        match self {
            PolicyState::Fifo(p) => p.on_access(key),
            PolicyState::Lru(p) => p.on_access(key),
            PolicyState::Lfu(p) => p.on_access(key),
            PolicyState::Mru(p) => p.on_access(key),
        }
    }

    /// Records a value overwrite. Every variant except FIFO treats this as
    /// an access; FIFO keeps the key's insertion position untouched.
    pub fn on_overwrite(&mut self, key: &K) -> bool {
        match self {
            PolicyState::Fifo(p) => p.contains(key),
            PolicyState::Lru(p) => p.on_access(key),
            PolicyState::Lfu(p) => p.on_access(key),
            PolicyState::Mru(p) => p.on_access(key),
        }
    }

    /// Returns the key the variant would evict next. Pure query; `None`
    /// only when the policy is empty.
    pub fn select_victim(&self) -> Option<K> {
        match self {
            PolicyState::Fifo(p) => p.select_victim(),
            PolicyState::Lru(p) => p.select_victim(),
            PolicyState::Lfu(p) => p.select_victim(),
            PolicyState::Mru(p) => p.select_victim(),
        }
    }

    /// Drops the bookkeeping for an evicted key. Called exactly once,
    /// immediately after `select_victim` returned that key.
    pub fn on_evict(&mut self, key: &K) {
        match self {
            PolicyState::Fifo(p) => p.on_evict(key),
            PolicyState::Lru(p) => p.on_evict(key),
            PolicyState::Lfu(p) => p.on_evict(key),
            PolicyState::Mru(p) => p.on_evict(key),
        }
    }

    /// Keys in the order the variant would evict them, victim first.
    pub fn eviction_order(&self) -> Vec<K> {
        match self {
            PolicyState::Fifo(p) => p.eviction_order(),
            PolicyState::Lru(p) => p.eviction_order(),
            PolicyState::Lfu(p) => p.eviction_order(),
            PolicyState::Mru(p) => p.eviction_order(),
        }
    }

    /// Current frequency of `key`; `None` for non-frequency variants or
    /// untracked keys.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        match self {
            PolicyState::Lfu(p) => p.frequency(key),
            _ => None,
        }
    }

    /// Frequency bucket snapshot; `None` for non-frequency variants.
    pub fn keys_by_frequency(&self) -> Option<Vec<(u64, Vec<K>)>> {
        match self {
            PolicyState::Lfu(p) => Some(p.keys_by_frequency()),
            _ => None,
        }
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        match self {
            PolicyState::Fifo(p) => p.clear(),
            PolicyState::Lru(p) => p.clear(),
            PolicyState::Lfu(p) => p.clear(),
            PolicyState::Mru(p) => p.clear(),
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        match self {
            PolicyState::Fifo(p) => p.debug_validate_invariants(),
            PolicyState::Lru(p) => p.debug_validate_invariants(),
            PolicyState::Lfu(p) => p.debug_validate_invariants(),
            PolicyState::Mru(p) => p.debug_validate_invariants(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in PolicyKind::all() {
            assert_eq!(kind.name().parse::<PolicyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        let err = "CLOCK".parse::<PolicyKind>().unwrap_err();
        assert_eq!(err.name(), "CLOCK");
    }

    #[test]
    fn dispatch_reports_the_right_kind() {
        for kind in PolicyKind::all() {
            let state: PolicyState<u32> = PolicyState::new(kind, 4);
            assert_eq!(state.kind(), kind);
            assert!(state.is_empty());
            assert_eq!(state.select_victim(), None);
        }
    }

    #[test]
    fn overwrite_is_an_access_everywhere_but_fifo() {
        for kind in PolicyKind::all() {
            let mut state: PolicyState<u32> = PolicyState::new(kind, 4);
            state.on_insert(1);
            state.on_insert(2);
            assert!(state.on_overwrite(&1));

            let expected = match kind {
                // FIFO keeps key 1 at the queue head despite the overwrite.
                PolicyKind::Fifo => 1,
                // LRU: 1 is now most recent, so 2 is the victim.
                PolicyKind::Lru => 2,
                // LFU: 1 is at freq=2, 2 alone at freq=1.
                PolicyKind::Lfu => 2,
                // MRU: 1 is now most recent, so it is the victim.
                PolicyKind::Mru => 1,
            };
            assert_eq!(state.select_victim(), Some(expected), "{kind}");
        }
    }

    #[test]
    fn frequency_queries_only_answer_for_lfu() {
        let mut lfu: PolicyState<u32> = PolicyState::new(PolicyKind::Lfu, 4);
        lfu.on_insert(1);
        assert_eq!(lfu.frequency(&1), Some(1));
        assert!(lfu.keys_by_frequency().is_some());

        let mut lru: PolicyState<u32> = PolicyState::new(PolicyKind::Lru, 4);
        lru.on_insert(1);
        assert_eq!(lru.frequency(&1), None);
        assert!(lru.keys_by_frequency().is_none());
    }

    #[test]
    fn eviction_order_matches_variant_discipline() {
        let mut fifo: PolicyState<u32> = PolicyState::new(PolicyKind::Fifo, 4);
        let mut mru: PolicyState<u32> = PolicyState::new(PolicyKind::Mru, 4);
        for key in 1..=3 {
            fifo.on_insert(key);
            mru.on_insert(key);
        }
        assert_eq!(fifo.eviction_order(), vec![1, 2, 3]);
        assert_eq!(mru.eviction_order(), vec![3, 2, 1]);
    }
}
