//! Named-cache registry: one cache per policy, routed by name.
//!
//! The registry is the comparison harness of the crate. It owns one
//! [`PolicyCache`] per registered policy, forwards `get`/`put` by policy
//! name, and keeps its own per-name aggregates (hits, misses, and wall time
//! spent inside routed calls) independently of each cache's internal
//! counters. `compare()` ranks the registered policies by observed hit rate.
//!
//! The policy set is fixed at construction; routing to any other name
//! returns [`UnknownPolicy`]. Ranking ties resolve to the earliest-registered
//! name, so a registry built from the same config ranks deterministically.
//!
//! # Example
//!
//! ```
//! use cachelab::config::CacheConfig;
//! use cachelab::manager::CacheRegistry;
//!
//! let mut registry: CacheRegistry<u32, String> =
//!     CacheRegistry::new(&CacheConfig::default()).unwrap();
//!
//! registry.put(1, "content".to_string(), "LRU").unwrap();
//! assert_eq!(registry.get(&1, "LRU").unwrap(), Some(&"content".to_string()));
//! assert_eq!(registry.get(&1, "FIFO").unwrap(), None);
//!
//! let comparison = registry.compare();
//! assert_eq!(comparison.best, "LRU");
//! ```

use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::PolicyCache;
use crate::config::CacheConfig;
use crate::error::{ConfigError, UnknownPolicy};
use crate::stats::{self, PolicyReport, RegistryComparison};

#[derive(Debug)]
struct RegistryEntry<K, V> {
    name: String,
    cache: PolicyCache<K, V>,
    hits: u64,
    misses: u64,
    ops: u64,
    total_time: Duration,
}

impl<K, V> RegistryEntry<K, V> {
    fn report(&self) -> PolicyReport {
        let avg_time = if self.ops == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.ops as u32
        };
        PolicyReport {
            name: self.name.clone(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: stats::hit_rate(self.hits, self.hits + self.misses),
            total_time: self.total_time,
            avg_time,
        }
    }
}

/// Fixed set of named caches with per-name aggregate statistics.
#[derive(Debug)]
pub struct CacheRegistry<K, V> {
    entries: Vec<RegistryEntry<K, V>>,
    index: FxHashMap<String, usize>,
}

impl<K, V> CacheRegistry<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Builds one cache per configured policy, registered in config order.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.policies.is_empty() {
            return Err(ConfigError::new("registry needs at least one policy"));
        }
        let mut entries = Vec::with_capacity(config.policies.len());
        let mut index = FxHashMap::default();
        for &kind in &config.policies {
            let name = kind.name().to_string();
            index.insert(name.clone(), entries.len());
            entries.push(RegistryEntry {
                name,
                cache: PolicyCache::new(kind, config.capacity),
                hits: 0,
                misses: 0,
                ops: 0,
                total_time: Duration::ZERO,
            });
        }
        Ok(Self { entries, index })
    }

    /// Registered policy names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no caches are registered. Construction forbids
    /// this, so it only answers `true` for a registry that was never built.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `key` in the named cache, recording elapsed wall time and
    /// the hit/miss outcome into that name's aggregates.
    pub fn get(&mut self, key: &K, policy: &str) -> Result<Option<&V>, UnknownPolicy> {
        let idx = self.resolve(policy)?;
        let entry = &mut self.entries[idx];

        let start = Instant::now();
        let hit = entry.cache.get(key).is_some();
        entry.total_time += start.elapsed();
        entry.ops += 1;
        if hit {
            entry.hits += 1;
        } else {
            entry.misses += 1;
        }

        // The value is re-read without counting a second access.
        Ok(if hit {
            self.entries[idx].cache.peek(key)
        } else {
            None
        })
    }

    /// Stores `key` in the named cache, recording elapsed wall time into
    /// that name's aggregates. Hit/miss counts move only on `get`.
    pub fn put(&mut self, key: K, value: V, policy: &str) -> Result<(), UnknownPolicy> {
        let idx = self.resolve(policy)?;
        let entry = &mut self.entries[idx];

        let start = Instant::now();
        entry.cache.put(key, value);
        entry.total_time += start.elapsed();
        entry.ops += 1;
        Ok(())
    }

    /// Borrows the named cache for introspection.
    pub fn cache(&self, policy: &str) -> Result<&PolicyCache<K, V>, UnknownPolicy> {
        let idx = self.resolve(policy)?;
        Ok(&self.entries[idx].cache)
    }

    /// Mutably borrows the named cache. Calls made directly on the cache
    /// bypass the registry's aggregates.
    pub fn cache_mut(&mut self, policy: &str) -> Result<&mut PolicyCache<K, V>, UnknownPolicy> {
        let idx = self.resolve(policy)?;
        Ok(&mut self.entries[idx].cache)
    }

    /// Aggregate report for one named cache.
    pub fn report(&self, policy: &str) -> Result<PolicyReport, UnknownPolicy> {
        let idx = self.resolve(policy)?;
        Ok(self.entries[idx].report())
    }

    /// Empties the named cache. Aggregates are left in place; use
    /// [`reset_stats`](Self::reset_stats) to zero them.
    pub fn clear(&mut self, policy: &str) -> Result<(), UnknownPolicy> {
        let idx = self.resolve(policy)?;
        self.entries[idx].cache.clear();
        Ok(())
    }

    /// Empties every registered cache.
    pub fn clear_all(&mut self) {
        for entry in &mut self.entries {
            entry.cache.clear();
        }
    }

    /// Zeroes the per-name aggregates and every cache's own counters,
    /// leaving cache contents untouched.
    pub fn reset_stats(&mut self) {
        for entry in &mut self.entries {
            entry.hits = 0;
            entry.misses = 0;
            entry.ops = 0;
            entry.total_time = Duration::ZERO;
            entry.cache.reset_stats();
        }
    }

    /// Ranks every registered policy by aggregate hit rate.
    ///
    /// Ties resolve to the earliest-registered name: the scan keeps the
    /// incumbent unless a later policy is strictly better.
    pub fn compare(&self) -> RegistryComparison {
        let reports: Vec<PolicyReport> =
            self.entries.iter().map(|entry| entry.report()).collect();

        let mut best = 0usize;
        for (i, report) in reports.iter().enumerate().skip(1) {
            if report.hit_rate > reports[best].hit_rate {
                best = i;
            }
        }
        RegistryComparison {
            best: reports[best].name.clone(),
            reports,
        }
    }

    fn resolve(&self, policy: &str) -> Result<usize, UnknownPolicy> {
        self.index
            .get(policy)
            .copied()
            .ok_or_else(|| UnknownPolicy::new(policy))
    }
}
