//! Seeded request-stream generators for the simulator.
//!
//! Produces text-id streams under four access patterns:
//!
//! | Distribution | Shape                                                  |
//! |--------------|--------------------------------------------------------|
//! | `uniform`    | Every id in the corpus equally likely                  |
//! | `poisson`    | Poisson(λ) samples mapped into the id range            |
//! | `weighted`   | A narrow id band drawn with elevated probability       |
//! | `mixed`      | Thirds of the above, shuffled together                 |
//!
//! Streams are driven by a seeded [`StdRng`], so a (seed, distribution,
//! length) triple always reproduces the same stream, which is what lets the
//! simulator replay identical traffic through every policy.

use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, Poisson};

use crate::config::{Distribution, PoissonParams, SimulationConfig, WeightedParams};
use crate::error::ConfigError;

/// Seeded generator over one text-id range.
#[derive(Debug)]
pub struct RequestGenerator {
    range: (u32, u32),
    rng: StdRng,
    poisson: Poisson<f64>,
    weighted: WeightedParams,
}

impl RequestGenerator {
    /// Creates a generator; fails on invalid distribution parameters.
    pub fn new(
        range: (u32, u32),
        poisson: PoissonParams,
        weighted: WeightedParams,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        poisson.validate()?;
        weighted.validate()?;
        if range.0 > range.1 {
            return Err(ConfigError::new(format!(
                "id range {}..={} is empty",
                range.0, range.1
            )));
        }
        let poisson = Poisson::new(poisson.lambda)
            .map_err(|_| ConfigError::new("poisson lambda rejected"))?;
        Ok(Self {
            range,
            rng: StdRng::seed_from_u64(seed),
            poisson,
            weighted,
        })
    }

    /// Generator wired from a simulation config, with a per-stream seed.
    pub fn from_config(config: &SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config.text_range, config.poisson, config.weighted, seed)
    }

    /// Generates `count` ids following `distribution`.
    pub fn generate(&mut self, distribution: Distribution, count: usize) -> Vec<u32> {
        match distribution {
            Distribution::Uniform => self.generate_uniform(count),
            Distribution::Poisson => self.generate_poisson(count),
            Distribution::Weighted => self.generate_weighted(count),
            Distribution::Mixed => self.generate_mixed(count),
        }
    }

    fn generate_uniform(&mut self, count: usize) -> Vec<u32> {
        let ids = Uniform::from(self.range.0..=self.range.1);
        (0..count).map(|_| self.rng.sample(ids)).collect()
    }

    /// Poisson samples folded into the id range, preserving the mass
    /// concentration around λ when λ lies inside the range.
    fn generate_poisson(&mut self, count: usize) -> Vec<u32> {
        let span = (self.range.1 - self.range.0 + 1) as u64;
        (0..count)
            .map(|_| {
                let sample: f64 = self.poisson.sample(&mut self.rng);
                (sample as u64 % span) as u32 + self.range.0
            })
            .collect()
    }

    fn generate_weighted(&mut self, count: usize) -> Vec<u32> {
        let (lo, hi) = self.range;
        let special_lo = self.weighted.special_range.0.clamp(lo, hi);
        let special_hi = self.weighted.special_range.1.clamp(lo, hi);
        let special_span = special_hi - special_lo + 1;
        let normal_span = (hi - lo + 1) - special_span;

        (0..count)
            .map(|_| {
                if normal_span == 0 || self.rng.gen_bool(self.weighted.special_probability) {
                    self.rng.gen_range(special_lo..=special_hi)
                } else {
                    // Uniform over the ids outside the special band: sample
                    // an index and skip over the band.
                    let idx = self.rng.gen_range(0..normal_span);
                    let id = lo + idx;
                    if id >= special_lo { id + special_span } else { id }
                }
            })
            .collect()
    }

    fn generate_mixed(&mut self, count: usize) -> Vec<u32> {
        let third = count / 3;
        let mut ids = self.generate_uniform(third);
        ids.extend(self.generate_poisson(third));
        ids.extend(self.generate_weighted(count - 2 * third));
        ids.shuffle(&mut self.rng);
        ids
    }

    /// Summarizes a stream: basic moments plus the fraction landing in the
    /// configured special band.
    pub fn analyze(&self, samples: &[u32]) -> DistributionSummary {
        if samples.is_empty() {
            return DistributionSummary::default();
        }
        let total = samples.len();
        let min = *samples.iter().min().unwrap_or(&0);
        let max = *samples.iter().max().unwrap_or(&0);
        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / total as f64;
        let variance = samples
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / total as f64;

        let mut unique: Vec<u32> = samples.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let (slo, shi) = self.weighted.special_range;
        let special_count = samples.iter().filter(|&&s| s >= slo && s <= shi).count();

        DistributionSummary {
            total,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            unique: unique.len(),
            special_count,
            special_fraction: special_count as f64 / total as f64,
        }
    }
}

/// Basic statistics over a generated stream.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistributionSummary {
    pub total: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub std_dev: f64,
    /// Distinct ids observed.
    pub unique: usize,
    /// Samples inside the weighted special band.
    pub special_count: usize,
    pub special_fraction: f64,
}
