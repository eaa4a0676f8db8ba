//! Full simulation: race every policy over synthetic request streams and
//! print the report.

use std::sync::Arc;

use cachelab::config::{DelayConfig, SimulationConfig};
use cachelab::provider::TextArchive;
use cachelab::workload::Simulator;

fn main() {
    let config = SimulationConfig::default();
    let archive = Arc::new(TextArchive::synthetic(DelayConfig::default()));

    let simulator = Simulator::new(config, Arc::clone(&archive)).expect("valid default config");
    let report = simulator.run();

    print!("{}", report.render_text());

    let reads = archive.read_stats();
    println!(
        "archive served {} reads in {:?}",
        reads.reads, reads.total_time
    );

    if let Ok(path) = report.write_csv(std::env::temp_dir()) {
        println!("csv written to {}", path.display());
    }
}
