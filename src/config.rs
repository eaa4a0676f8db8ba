//! Configuration structs for caches, the provider, and the simulator.
//!
//! Everything that the reference system kept as process-wide settings lives
//! here as explicit values handed to constructors: cache capacity and policy
//! set, the text id range, distribution parameters, simulated disk latency,
//! and the simulation scenario matrix. Defaults reproduce the reference
//! setup (capacity 10, ids 1–100, 200 requests per user, λ = 50, ids 30–40
//! drawn with 43% probability, 10–20 ms simulated latency).

use std::time::Duration;

use crate::error::ConfigError;
use crate::policy::PolicyKind;

/// Inclusive id range of the text corpus.
pub const TEXT_ID_RANGE: (u32, u32) = (1, 100);

/// Cache construction parameters: one capacity shared by a fixed policy set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum entries per cache. 0 is legal and disables caching.
    pub capacity: usize,
    /// Policies to register, in registration (and ranking tie-break) order.
    pub policies: Vec<PolicyKind>,
}

impl CacheConfig {
    /// Rejects duplicate policies; the registry routes by unique name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, kind) in self.policies.iter().enumerate() {
            if self.policies[..i].contains(kind) {
                return Err(ConfigError::new(format!(
                    "policy {kind} registered more than once"
                )));
            }
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            policies: PolicyKind::all().to_vec(),
        }
    }
}

/// Parameters of the Poisson request distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonParams {
    /// Mean of the distribution before mapping into the id range.
    pub lambda: f64,
}

impl PoissonParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.lambda.is_finite() || self.lambda <= 0.0 {
            return Err(ConfigError::new(format!(
                "poisson lambda must be positive, got {}",
                self.lambda
            )));
        }
        Ok(())
    }
}

impl Default for PoissonParams {
    fn default() -> Self {
        Self { lambda: 50.0 }
    }
}

/// Parameters of the weighted request distribution: a narrow id band drawn
/// with elevated probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedParams {
    /// Inclusive id band that receives the extra weight.
    pub special_range: (u32, u32),
    /// Probability of drawing from the special band on each request.
    pub special_probability: f64,
}

impl WeightedParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.special_range.0 > self.special_range.1 {
            return Err(ConfigError::new(format!(
                "special range {}..={} is empty",
                self.special_range.0, self.special_range.1
            )));
        }
        if !(0.0..=1.0).contains(&self.special_probability) {
            return Err(ConfigError::new(format!(
                "special probability must be within [0, 1], got {}",
                self.special_probability
            )));
        }
        Ok(())
    }
}

impl Default for WeightedParams {
    fn default() -> Self {
        Self {
            special_range: (30, 40),
            special_probability: 0.43,
        }
    }
}

/// Simulated disk latency applied by the text provider on each load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayConfig {
    /// Whether loads sleep at all.
    pub enabled: bool,
    /// Lower latency bound.
    pub min: Duration,
    /// Upper latency bound.
    pub max: Duration,
}

impl DelayConfig {
    /// Latency disabled entirely; useful for tests and benchmarks.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::new(format!(
                "delay min {:?} exceeds max {:?}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min: Duration::from_millis(10),
            max: Duration::from_millis(20),
        }
    }
}

/// Request distributions the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// Every id equally likely.
    Uniform,
    /// Poisson-distributed ids mapped into the corpus range.
    Poisson,
    /// A special id band drawn with elevated probability.
    Weighted,
    /// Roughly equal thirds of the other three, shuffled together.
    Mixed,
}

impl Distribution {
    pub fn name(self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Poisson => "poisson",
            Distribution::Weighted => "weighted",
            Distribution::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One simulated user: an id and the access pattern they follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub user_id: u32,
    pub distribution: Distribution,
}

/// Full simulation setup: which caches to race over which request streams.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Cache capacity and policy set raced in the simulation.
    pub cache: CacheConfig,
    /// Requests generated per user scenario.
    pub requests_per_user: usize,
    /// User scenarios; each runs once against every policy.
    pub scenarios: Vec<Scenario>,
    /// Inclusive id range requests are drawn from.
    pub text_range: (u32, u32),
    /// Base RNG seed; each (policy, user) run derives its own stream.
    pub seed: u64,
    pub poisson: PoissonParams,
    pub weighted: WeightedParams,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.poisson.validate()?;
        self.weighted.validate()?;
        if self.text_range.0 > self.text_range.1 {
            return Err(ConfigError::new(format!(
                "text range {}..={} is empty",
                self.text_range.0, self.text_range.1
            )));
        }
        if self.requests_per_user == 0 {
            return Err(ConfigError::new("requests_per_user must be at least 1"));
        }
        if self.scenarios.is_empty() {
            return Err(ConfigError::new("at least one scenario is required"));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            requests_per_user: 200,
            scenarios: vec![
                Scenario {
                    user_id: 1,
                    distribution: Distribution::Uniform,
                },
                Scenario {
                    user_id: 2,
                    distribution: Distribution::Poisson,
                },
                Scenario {
                    user_id: 3,
                    distribution: Distribution::Weighted,
                },
            ],
            text_range: TEXT_ID_RANGE,
            seed: 42,
            poisson: PoissonParams::default(),
            weighted: WeightedParams::default(),
        }
    }
}
