//! Simulation reporting: summaries, rankings, text and CSV rendering.
//!
//! Condenses the raw per-run results into per-policy summaries and a final
//! ranking, mirroring what the registry's `compare()` does for live caches
//! but over simulated traffic. Output stops at text and CSV; chart rendering
//! is somebody else's job.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use log::info;

use crate::config::{Distribution, SimulationConfig};
use crate::policy::PolicyKind;
use crate::workload::simulator::RunResult;

/// Per-policy rollup across every scenario it ran.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySummary {
    pub policy: PolicyKind,
    /// Scenario runs aggregated.
    pub runs: usize,
    /// Mean hit rate across those runs.
    pub avg_hit_rate: f64,
    /// Mean per-request load time across those runs.
    pub avg_load_time: Duration,
    /// Scenario distribution where the policy did best.
    pub best_distribution: Distribution,
    /// Hit rate achieved under that distribution.
    pub best_hit_rate: f64,
}

/// Full outcome of one simulation.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Local time the report was assembled.
    pub started_at: DateTime<Local>,
    /// Cache capacity the simulation ran with.
    pub capacity: usize,
    pub requests_per_user: usize,
    /// Raw results, ordered by (policy registration, user id).
    pub runs: Vec<RunResult>,
    /// One rollup per policy, in registration order.
    pub summaries: Vec<PolicySummary>,
    /// Policy with the highest average hit rate; ties resolve to the
    /// earliest-registered policy.
    pub best_policy: PolicyKind,
}

impl SimulationReport {
    /// Builds summaries and the ranking from sorted run results.
    pub(crate) fn assemble(config: &SimulationConfig, runs: Vec<RunResult>) -> Self {
        let mut summaries = Vec::with_capacity(config.cache.policies.len());

        for &policy in &config.cache.policies {
            let policy_runs: Vec<&RunResult> =
                runs.iter().filter(|run| run.policy == policy).collect();
            if policy_runs.is_empty() {
                continue;
            }

            let count = policy_runs.len();
            let avg_hit_rate =
                policy_runs.iter().map(|run| run.hit_rate).sum::<f64>() / count as f64;
            let avg_load_time = policy_runs
                .iter()
                .map(|run| run.avg_load_time)
                .sum::<Duration>()
                / count as u32;

            let mut best = policy_runs[0];
            for run in &policy_runs[1..] {
                if run.hit_rate > best.hit_rate {
                    best = run;
                }
            }

            summaries.push(PolicySummary {
                policy,
                runs: count,
                avg_hit_rate,
                avg_load_time,
                best_distribution: best.distribution,
                best_hit_rate: best.hit_rate,
            });
        }

        let mut best_idx = 0usize;
        for (i, summary) in summaries.iter().enumerate().skip(1) {
            if summary.avg_hit_rate > summaries[best_idx].avg_hit_rate {
                best_idx = i;
            }
        }
        let best_policy = summaries
            .get(best_idx)
            .map(|summary| summary.policy)
            .unwrap_or(PolicyKind::Fifo);

        Self {
            started_at: Local::now(),
            capacity: config.cache.capacity,
            requests_per_user: config.requests_per_user,
            runs,
            summaries,
            best_policy,
        }
    }

    /// Plain-text rendering of the summaries and ranking.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Simulation of {} ({} requests/user, capacity {})\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.requests_per_user,
            self.capacity,
        ));
        out.push_str(&format!(
            "{:<8} {:>6} {:>12} {:>14} {:>12} {:>12}\n",
            "policy", "runs", "avg hit %", "avg load", "best dist", "best hit %"
        ));
        for summary in &self.summaries {
            out.push_str(&format!(
                "{:<8} {:>6} {:>12.2} {:>14?} {:>12} {:>12.2}\n",
                summary.policy.name(),
                summary.runs,
                summary.avg_hit_rate,
                summary.avg_load_time,
                summary.best_distribution.name(),
                summary.best_hit_rate,
            ));
        }
        out.push_str(&format!("best policy: {}\n", self.best_policy));
        out
    }

    /// CSV rendering with one row per run.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "policy,user_id,distribution,requests,hits,misses,hit_rate,total_load_ms,avg_load_us\n",
        );
        for run in &self.runs {
            out.push_str(&format!(
                "{},{},{},{},{},{},{:.4},{:.3},{:.3}\n",
                run.policy.name(),
                run.user_id,
                run.distribution.name(),
                run.requests,
                run.hits,
                run.misses,
                run.hit_rate,
                run.total_load_time.as_secs_f64() * 1e3,
                run.avg_load_time.as_secs_f64() * 1e6,
            ));
        }
        out
    }

    /// Writes the CSV next to a timestamped filename under `dir` and
    /// returns the path.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let filename = format!(
            "simulation_results_{}.csv",
            self.started_at.format("%Y%m%d_%H%M%S")
        );
        let path = dir.as_ref().join(filename);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(self.to_csv().as_bytes())?;
        info!("wrote simulation results to {}", path.display());
        Ok(path)
    }
}
