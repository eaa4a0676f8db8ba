//! Statistics snapshots for caches and the registry.
//!
//! Plain value types captured at call time; nothing here holds references
//! into live cache state. Gauges (`len`, `capacity`) reflect the moment the
//! snapshot was taken.

use std::time::Duration;

use crate::policy::PolicyKind;

/// Point-in-time counters for a single cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    /// Which policy the cache runs.
    pub policy: PolicyKind,
    /// Configured capacity.
    pub capacity: usize,
    /// Entries resident when the snapshot was taken.
    pub len: usize,
    /// Total `get` calls.
    pub accesses: u64,
    /// `get` calls that found the key.
    pub hits: u64,
    /// `get` calls that missed.
    pub misses: u64,
    /// `hits / accesses * 100`, or 0 when there were no accesses.
    pub hit_rate: f64,
}

/// Aggregated registry-side view of one named cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyReport {
    /// Registry routing name.
    pub name: String,
    /// Hits observed through the registry.
    pub hits: u64,
    /// Misses observed through the registry.
    pub misses: u64,
    /// `hits / (hits + misses) * 100`, or 0 with no traffic.
    pub hit_rate: f64,
    /// Wall time spent inside routed `get` calls.
    pub total_time: Duration,
    /// `total_time` divided by routed `get` calls, or zero with no traffic.
    pub avg_time: Duration,
}

/// Result of ranking every registered policy by observed hit rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryComparison {
    /// One report per registered cache, in registration order.
    pub reports: Vec<PolicyReport>,
    /// Name of the policy with the highest hit rate; ties resolve to the
    /// earliest-registered name.
    pub best: String,
}

/// Computes a percentage hit rate, defined as 0 when there was no traffic.
pub(crate) fn hit_rate(hits: u64, accesses: u64) -> f64 {
    if accesses == 0 {
        0.0
    } else {
        hits as f64 / accesses as f64 * 100.0
    }
}
