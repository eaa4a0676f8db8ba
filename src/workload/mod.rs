//! Synthetic workload generation, simulation, and reporting.
//!
//! Drives the cache core from the outside, exactly as a real caller would:
//! generate a request stream, `get` on the cache, `load` from the archive on
//! a miss, `put` the result back. Nothing in here reaches into cache
//! internals beyond the public stats surface.

pub mod generator;
pub mod report;
pub mod simulator;

pub use generator::{DistributionSummary, RequestGenerator};
pub use report::{PolicySummary, SimulationReport};
pub use simulator::{RunResult, Simulator};
