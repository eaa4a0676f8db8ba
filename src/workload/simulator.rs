//! Workload simulator: races every policy over identical request streams.
//!
//! For each user scenario, one request stream is generated up front from the
//! scenario's seed; every policy then replays that same stream against a
//! fresh cache, so hit-rate differences are attributable to the policy
//! alone. Each (policy × scenario) run owns its cache exclusively and runs
//! on its own thread; the cache core takes no locks, so isolation is the
//! concurrency discipline. The shared text archive counts its reads with
//! atomics, and finished runs land in a `parking_lot::Mutex`-guarded vector.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use parking_lot::Mutex;

use crate::cache::PolicyCache;
use crate::config::{Distribution, Scenario, SimulationConfig};
use crate::error::ConfigError;
use crate::policy::PolicyKind;
use crate::provider::TextArchive;
use crate::workload::generator::RequestGenerator;
use crate::workload::report::SimulationReport;

/// Outcome of replaying one request stream through one policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub policy: PolicyKind,
    pub user_id: u32,
    pub distribution: Distribution,
    /// Requests replayed.
    pub requests: usize,
    pub hits: u64,
    pub misses: u64,
    /// Percentage of requests answered from cache.
    pub hit_rate: f64,
    /// Wall time for the whole replay, archive loads included.
    pub total_load_time: Duration,
    /// `total_load_time / requests`.
    pub avg_load_time: Duration,
    /// Entries resident when the replay finished.
    pub final_len: usize,
}

/// Drives a full simulation over one archive and one configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cachelab::config::{DelayConfig, SimulationConfig};
/// use cachelab::provider::TextArchive;
/// use cachelab::workload::Simulator;
///
/// let config = SimulationConfig {
///     requests_per_user: 50,
///     ..SimulationConfig::default()
/// };
/// let archive = Arc::new(TextArchive::synthetic(DelayConfig::disabled()));
/// let report = Simulator::new(config, archive).unwrap().run();
///
/// // 4 policies × 3 scenarios
/// assert_eq!(report.runs.len(), 12);
/// ```
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    archive: Arc<TextArchive>,
}

impl Simulator {
    /// Validates the configuration and binds the archive.
    pub fn new(config: SimulationConfig, archive: Arc<TextArchive>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, archive })
    }

    /// Runs every (policy × scenario) combination and assembles the report.
    pub fn run(&self) -> SimulationReport {
        let streams = self.generate_streams();
        let results: Mutex<Vec<RunResult>> = Mutex::new(Vec::new());

        info!(
            "simulating {} policies x {} scenarios, {} requests each",
            self.config.cache.policies.len(),
            streams.len(),
            self.config.requests_per_user,
        );

        std::thread::scope(|scope| {
            for &policy in &self.config.cache.policies {
                for (scenario, stream) in &streams {
                    let results = &results;
                    scope.spawn(move || {
                        let result = self.replay(policy, *scenario, stream);
                        results.lock().push(result);
                    });
                }
            }
        });

        let mut runs = results.into_inner();
        // Thread completion order is nondeterministic; restore the
        // (policy registration, user) order the config describes.
        let policy_rank = |p: PolicyKind| {
            self.config
                .cache
                .policies
                .iter()
                .position(|&k| k == p)
                .unwrap_or(usize::MAX)
        };
        runs.sort_by_key(|run| (policy_rank(run.policy), run.user_id));

        SimulationReport::assemble(&self.config, runs)
    }

    /// One stream per scenario, derived from the base seed and the user id
    /// so every policy replays identical traffic.
    fn generate_streams(&self) -> Vec<(Scenario, Vec<u32>)> {
        self.config
            .scenarios
            .iter()
            .map(|&scenario| {
                let seed = self
                    .config
                    .seed
                    .wrapping_add((scenario.user_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                // Parameters were validated in `new`.
                let stream = match RequestGenerator::from_config(&self.config, seed) {
                    Ok(mut generator) => {
                        generator.generate(scenario.distribution, self.config.requests_per_user)
                    }
                    Err(_) => Vec::new(),
                };
                (scenario, stream)
            })
            .collect()
    }

    fn replay(&self, policy: PolicyKind, scenario: Scenario, stream: &[u32]) -> RunResult {
        let mut cache = PolicyCache::new(policy, self.config.cache.capacity);
        let mut total_load_time = Duration::ZERO;

        for &id in stream {
            let start = Instant::now();
            if cache.get(&id).is_none() {
                if let Some(content) = self.archive.load(id) {
                    cache.put(id, content);
                }
            }
            total_load_time += start.elapsed();
        }

        let stats = cache.stats();
        let requests = stream.len();
        let avg_load_time = if requests == 0 {
            Duration::ZERO
        } else {
            total_load_time / requests as u32
        };

        debug!(
            "{policy} / user {} ({}): {:.1}% hits over {requests} requests",
            scenario.user_id, scenario.distribution, stats.hit_rate,
        );

        RunResult {
            policy,
            user_id: scenario.user_id,
            distribution: scenario.distribution,
            requests,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate,
            total_load_time,
            avg_load_time,
            final_len: stats.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, DelayConfig};

    fn quick_config(requests: usize) -> SimulationConfig {
        SimulationConfig {
            requests_per_user: requests,
            ..SimulationConfig::default()
        }
    }

    fn simulator(config: SimulationConfig) -> Simulator {
        let archive = Arc::new(TextArchive::synthetic(DelayConfig::disabled()));
        Simulator::new(config, archive).unwrap()
    }

    #[test]
    fn runs_every_policy_scenario_combination() {
        let report = simulator(quick_config(30)).run();
        assert_eq!(report.runs.len(), 4 * 3);

        for run in &report.runs {
            assert_eq!(run.requests, 30);
            assert_eq!(run.hits + run.misses, 30);
            assert!(run.final_len <= 10);
        }
    }

    #[test]
    fn identical_streams_mean_counters_add_up() {
        let report = simulator(quick_config(50)).run();

        // Every policy replayed the same per-user streams, so each saw the
        // same number of requests for each user.
        for policy in crate::policy::PolicyKind::all() {
            let total: usize = report
                .runs
                .iter()
                .filter(|run| run.policy == policy)
                .map(|run| run.requests)
                .sum();
            assert_eq!(total, 150);
        }
    }

    #[test]
    fn results_are_deterministic_for_a_seed() {
        let a = simulator(quick_config(40)).run();
        let b = simulator(quick_config(40)).run();

        let key = |r: &RunResult| (r.policy, r.user_id, r.hits, r.misses);
        let ka: Vec<_> = a.runs.iter().map(key).collect();
        let kb: Vec<_> = b.runs.iter().map(key).collect();
        assert_eq!(ka, kb);
    }

    #[test]
    fn zero_capacity_simulation_never_hits() {
        let config = SimulationConfig {
            cache: CacheConfig {
                capacity: 0,
                ..CacheConfig::default()
            },
            ..quick_config(20)
        };
        let report = simulator(config).run();
        for run in &report.runs {
            assert_eq!(run.hits, 0);
            assert_eq!(run.final_len, 0);
        }
    }

    #[test]
    fn archive_reads_match_misses() {
        let archive = Arc::new(TextArchive::synthetic(DelayConfig::disabled()));
        let config = quick_config(25);
        let report = Simulator::new(config, Arc::clone(&archive)).unwrap().run();

        let total_misses: u64 = report.runs.iter().map(|run| run.misses).sum();
        assert_eq!(archive.read_stats().reads, total_misses);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let archive = Arc::new(TextArchive::synthetic(DelayConfig::disabled()));
        let config = SimulationConfig {
            requests_per_user: 0,
            ..SimulationConfig::default()
        };
        assert!(Simulator::new(config, archive).is_err());
    }
}
