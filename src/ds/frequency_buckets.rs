//! Frequency buckets for O(1) least-frequently-used tracking.
//!
//! Tracks per-key access counts and groups keys into frequency buckets so the
//! coldest key can be found without scanning. Within a bucket, keys keep
//! their arrival order into that frequency; the oldest arrival is evicted
//! first when frequencies tie.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                      FrequencyBuckets<K> Layout                      │
//! │                                                                      │
//! │   index: HashMap<K, SlotId>        entries: SlotArena<Entry<K>>      │
//! │   ┌───────────┬──────────┐         ┌──────┬───────────────────────┐  │
//! │   │    Key    │  SlotId  │         │ Slot │ Entry                 │  │
//! │   ├───────────┼──────────┤         ├──────┼───────────────────────┤  │
//! │   │  "text_a" │   id_0   │────────►│ id_0 │ freq:2, prev/next     │  │
//! │   │  "text_b" │   id_1   │────────►│ id_1 │ freq:1, prev/next     │  │
//! │   │  "text_c" │   id_2   │────────►│ id_2 │ freq:1, prev/next     │  │
//! │   └───────────┴──────────┘         └──────┴───────────────────────┘  │
//! │                                                                      │
//! │   buckets: HashMap<u64, Bucket>  (frequency → doubly-linked keys)    │
//! │                                                                      │
//! │   min_freq = 1                                                       │
//! │        │                                                             │
//! │        ▼                                                             │
//! │   freq=1: head ──► [id_1] ◄──► [id_2] ◄── tail                       │
//! │            oldest (evict first)    newest                            │
//! │                                                                      │
//! │   freq=2: head ──► [id_0] ◄── tail                                   │
//! │                                                                      │
//! │   Bucket chain:  freq=1 ──next──► freq=2                             │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation        | Time | Notes                                     |
//! |------------------|------|-------------------------------------------|
//! | `insert`         | O(1) | New key enters bucket 1, resets the min   |
//! | `touch`          | O(1) | freq+1, append to the new bucket's tail   |
//! | `remove`         | O(1) | Arbitrary key removal                     |
//! | `pop_oldest_min` | O(1) | Evict head of the minimum bucket          |
//! | `frequency`      | O(1) | Query a key's current count               |
//!
//! Non-empty buckets are chained in ascending frequency order so removing
//! the last entry of an arbitrary bucket still finds the next minimum in
//! O(1). `debug_validate_invariants()` is available in debug/test builds.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Entry<K> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: K,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev_freq: Option<u64>,
    next_freq: Option<u64>,
}

/// O(1) frequency tracker with oldest-first tie-breaking within a bucket.
///
/// # Example
///
/// ```
/// use cachelab::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// freq.insert("a");
/// freq.insert("b");
/// freq.touch(&"a"); // "a" now at freq=2
///
/// assert_eq!(freq.frequency(&"a"), Some(2));
/// assert_eq!(freq.frequency(&"b"), Some(1));
/// assert_eq!(freq.pop_oldest_min(), Some(("b", 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<K> {
    entries: SlotArena<Entry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty tracker with reserved capacity for entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current frequency of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Returns the smallest frequency with a non-empty bucket, if any.
    pub fn min_freq(&self) -> Option<u64> {
        if self.is_empty() { None } else { Some(self.min_freq) }
    }

    /// Starts tracking a brand-new key at frequency 1.
    ///
    /// A fresh arrival is always the coldest item, so the minimum frequency
    /// resets to 1 unconditionally. The caller must not insert a key that is
    /// already tracked.
    pub fn insert(&mut self, key: K) {
        debug_assert!(
            !self.index.contains_key(&key),
            "insert of already-tracked key"
        );
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key: key.clone(),
        });
        self.index.insert(key, id);
        if !self.buckets.contains_key(&1) {
            self.link_bucket_as_head(1);
        }
        self.append_to_bucket(1, id);
        self.min_freq = 1;
    }

    /// Increments `key`'s frequency, appending it to its new bucket's tail.
    ///
    /// Returns the new frequency, or `None` if the key is not tracked.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let old_freq = self.entries.get(id)?.freq;
        let new_freq = old_freq + 1;

        self.unlink_from_bucket(old_freq, id);
        let old_emptied = self.bucket_is_empty(old_freq);

        if !self.buckets.contains_key(&new_freq) {
            // The new bucket slots in right where the old one sits in the
            // chain; if the old bucket just drained it is replaced in place.
            self.link_bucket_after_existing(new_freq, old_freq);
        }
        if old_emptied {
            self.unlink_bucket(old_freq);
            if self.min_freq == old_freq {
                self.min_freq = new_freq;
            }
        }
        self.append_to_bucket(new_freq, id);

        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = new_freq;
        }
        Some(new_freq)
    }

    /// Stops tracking `key`, returning its final frequency.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        let freq = self.entries.get(id)?.freq;
        self.unlink_from_bucket(freq, id);
        if self.bucket_is_empty(freq) {
            let next = self.buckets.get(&freq).and_then(|b| b.next_freq);
            self.unlink_bucket(freq);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
        }
        self.entries.remove(id).map(|entry| entry.freq)
    }

    /// Returns the key that would be evicted next: the oldest arrival in the
    /// minimum-frequency bucket. Does not mutate.
    pub fn peek_oldest_min(&self) -> Option<&K> {
        let bucket = self.buckets.get(&self.min_freq)?;
        let id = bucket.head?;
        self.entries.get(id).map(|entry| &entry.key)
    }

    /// Removes and returns the eviction candidate together with its frequency.
    pub fn pop_oldest_min(&mut self) -> Option<(K, u64)> {
        let key = self.peek_oldest_min()?.clone();
        let freq = self.remove(&key)?;
        Some((key, freq))
    }

    /// Snapshot of the tracked keys grouped by frequency, ascending, with
    /// each bucket's keys in arrival order (oldest first).
    pub fn keys_by_frequency(&self) -> Vec<(u64, Vec<K>)> {
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        let mut freq = Some(self.min_freq);
        while let Some(f) = freq {
            let bucket = match self.buckets.get(&f) {
                Some(bucket) => bucket,
                None => break,
            };
            let mut keys = Vec::new();
            let mut current = bucket.head;
            while let Some(id) = current {
                if let Some(entry) = self.entries.get(id) {
                    keys.push(entry.key.clone());
                    current = entry.next;
                } else {
                    break;
                }
            }
            out.push((f, keys));
            freq = bucket.next_freq;
        }
        out
    }

    /// Drops all tracked keys and buckets.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn append_to_bucket(&mut self, freq: u64, id: SlotId) {
        let old_tail = match self.buckets.get(&freq) {
            Some(bucket) => bucket.tail,
            None => return,
        };
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = old_tail;
            entry.next = None;
        }
        if let Some(tail_id) = old_tail {
            if let Some(tail) = self.entries.get_mut(tail_id) {
                tail.next = Some(id);
            }
        }
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            if bucket.head.is_none() {
                bucket.head = Some(id);
            }
            bucket.tail = Some(id);
        }
    }

    fn unlink_from_bucket(&mut self, freq: u64, id: SlotId) {
        let (prev, next) = match self.entries.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };
        if let Some(prev_id) = prev {
            if let Some(entry) = self.entries.get_mut(prev_id) {
                entry.next = next;
            }
        }
        if let Some(next_id) = next {
            if let Some(entry) = self.entries.get_mut(next_id) {
                entry.prev = prev;
            }
        }
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            if bucket.head == Some(id) {
                bucket.head = next;
            }
            if bucket.tail == Some(id) {
                bucket.tail = prev;
            }
        }
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }

    /// Links a brand-new bucket as the head of the frequency chain.
    fn link_bucket_as_head(&mut self, freq: u64) {
        let old_head = if self.buckets.is_empty() {
            None
        } else {
            Some(self.min_freq)
        };
        if let Some(old) = old_head {
            if let Some(bucket) = self.buckets.get_mut(&old) {
                bucket.prev_freq = Some(freq);
            }
        }
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev_freq: None,
                next_freq: old_head,
            },
        );
    }

    /// Links a brand-new bucket for `freq` immediately after `anchor` in the
    /// chain. `anchor` must exist (it is the bucket an entry is leaving).
    fn link_bucket_after_existing(&mut self, freq: u64, anchor: u64) {
        let anchor_next = self.buckets.get(&anchor).and_then(|b| b.next_freq);
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev_freq: Some(anchor),
                next_freq: anchor_next,
            },
        );
        if let Some(bucket) = self.buckets.get_mut(&anchor) {
            bucket.next_freq = Some(freq);
        }
        if let Some(next) = anchor_next {
            if let Some(bucket) = self.buckets.get_mut(&next) {
                bucket.prev_freq = Some(freq);
            }
        }
    }

    /// Removes an emptied bucket from the chain.
    fn unlink_bucket(&mut self, freq: u64) {
        let bucket = match self.buckets.remove(&freq) {
            Some(bucket) => bucket,
            None => return,
        };
        debug_assert!(bucket.head.is_none(), "unlinking a non-empty bucket");
        if let Some(prev) = bucket.prev_freq {
            if let Some(prev_bucket) = self.buckets.get_mut(&prev) {
                prev_bucket.next_freq = bucket.next_freq;
            }
        }
        if let Some(next) = bucket.next_freq {
            if let Some(next_bucket) = self.buckets.get_mut(&next) {
                next_bucket.prev_freq = bucket.prev_freq;
            }
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.entries.len());
        if self.is_empty() {
            assert!(self.buckets.is_empty());
            return;
        }

        // min_freq names the smallest non-empty bucket.
        let smallest = self.buckets.keys().copied().min().expect("no buckets");
        assert_eq!(self.min_freq, smallest);

        // Every bucket in the chain is non-empty, ascending, and its entries
        // carry the bucket's frequency.
        let mut counted = 0usize;
        let mut freq = Some(self.min_freq);
        let mut last = 0u64;
        while let Some(f) = freq {
            assert!(f > last || counted == 0);
            let bucket = self.buckets.get(&f).expect("chained bucket missing");
            assert!(bucket.head.is_some());
            let mut current = bucket.head;
            let mut prev = None;
            while let Some(id) = current {
                let entry = self.entries.get(id).expect("entry missing");
                assert_eq!(entry.freq, f);
                assert_eq!(entry.prev, prev);
                assert_eq!(self.index.get(&entry.key), Some(&id));
                prev = Some(id);
                current = entry.next;
                counted += 1;
                assert!(counted <= self.len());
            }
            assert_eq!(bucket.tail, prev);
            last = f;
            freq = bucket.next_freq;
        }
        assert_eq!(counted, self.len());
    }
}

impl<K> Default for FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
