//! Text archive provider: the slow backing store the caches front.
//!
//! Models the original system's forensic disk: a corpus of numbered texts
//! (ids 1–100 by default) that is expensive to read, so every cache miss
//! costs real time. The archive is *consumed by* cache callers on a miss;
//! the cache core never calls it. Two backings are available:
//!
//! - **directory**: reads `<id>.txt` from a folder on disk;
//! - **synthetic**: derives deterministic content from the id, for
//!   simulations and tests that should not touch the filesystem.
//!
//! Each load can sleep a randomized interval (the simulated disk latency
//! from [`DelayConfig`]) before returning. Read counts and cumulative read
//! time are tracked with atomics so one archive can be shared by reference
//! across simulator threads.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::Rng;

use crate::config::{DelayConfig, TEXT_ID_RANGE};

/// Snapshot of disk-read accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Completed loads, including simulated latency.
    pub reads: u64,
    /// Wall time spent inside `load`.
    pub total_time: Duration,
}

#[derive(Debug)]
enum ArchiveSource {
    Directory(PathBuf),
    Synthetic,
}

/// Numbered text corpus with simulated read latency.
///
/// # Example
///
/// ```
/// use cachelab::config::DelayConfig;
/// use cachelab::provider::TextArchive;
///
/// let archive = TextArchive::synthetic(DelayConfig::disabled());
/// assert!(archive.load(1).is_some());
/// assert!(archive.load(101).is_none()); // outside the corpus
/// assert_eq!(archive.read_stats().reads, 1);
/// ```
#[derive(Debug)]
pub struct TextArchive {
    source: ArchiveSource,
    range: (u32, u32),
    delay: DelayConfig,
    reads: AtomicU64,
    read_nanos: AtomicU64,
}

impl TextArchive {
    /// Archive backed by deterministic synthetic content.
    pub fn synthetic(delay: DelayConfig) -> Self {
        Self::with_range(ArchiveSource::Synthetic, TEXT_ID_RANGE, delay)
    }

    /// Synthetic archive over a custom id range.
    pub fn synthetic_with_range(range: (u32, u32), delay: DelayConfig) -> Self {
        Self::with_range(ArchiveSource::Synthetic, range, delay)
    }

    /// Archive backed by `<id>.txt` files under `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>, delay: DelayConfig) -> Self {
        Self::with_range(ArchiveSource::Directory(dir.into()), TEXT_ID_RANGE, delay)
    }

    fn with_range(source: ArchiveSource, range: (u32, u32), delay: DelayConfig) -> Self {
        Self {
            source,
            range,
            delay,
            reads: AtomicU64::new(0),
            read_nanos: AtomicU64::new(0),
        }
    }

    /// Inclusive id range this archive serves.
    pub fn range(&self) -> (u32, u32) {
        self.range
    }

    /// Loads a text by id, sleeping the configured latency first.
    ///
    /// Returns `None` for ids outside the corpus range or missing files;
    /// callers treat absence as "nothing to cache", not as an error.
    pub fn load(&self, id: u32) -> Option<String> {
        if id < self.range.0 || id > self.range.1 {
            return None;
        }

        let start = Instant::now();
        self.simulate_latency();

        let content = match &self.source {
            ArchiveSource::Synthetic => Some(synthesize(id)),
            ArchiveSource::Directory(dir) => {
                let path = dir.join(format!("{id}.txt"));
                match std::fs::read_to_string(&path) {
                    Ok(content) => Some(content),
                    Err(err) => {
                        warn!("failed to read {}: {err}", path.display());
                        None
                    }
                }
            }
        };

        if content.is_some() {
            self.reads.fetch_add(1, Ordering::Relaxed);
            self.read_nanos
                .fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
            debug!("loaded text {id} in {:?}", start.elapsed());
        }
        content
    }

    /// Ids that `load` would currently succeed for.
    pub fn available(&self) -> Vec<u32> {
        match &self.source {
            ArchiveSource::Synthetic => (self.range.0..=self.range.1).collect(),
            ArchiveSource::Directory(dir) => (self.range.0..=self.range.1)
                .filter(|id| dir.join(format!("{id}.txt")).is_file())
                .collect(),
        }
    }

    /// Snapshot of read accounting.
    pub fn read_stats(&self) -> ReadStats {
        ReadStats {
            reads: self.reads.load(Ordering::Relaxed),
            total_time: Duration::from_nanos(self.read_nanos.load(Ordering::Relaxed)),
        }
    }

    /// Zeroes read accounting.
    pub fn reset_stats(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.read_nanos.store(0, Ordering::Relaxed);
    }

    fn simulate_latency(&self) {
        if !self.delay.enabled || self.delay.max.is_zero() {
            return;
        }
        let min = self.delay.min.as_nanos() as u64;
        let max = self.delay.max.as_nanos() as u64;
        let nanos = if min >= max {
            max
        } else {
            rand::thread_rng().gen_range(min..=max)
        };
        std::thread::sleep(Duration::from_nanos(nanos));
    }
}

/// Deterministic filler content for a synthetic text.
fn synthesize(id: u32) -> String {
    let mut content = format!("Archive text {id}\n");
    // A few paragraphs so values have realistic weight relative to keys.
    for paragraph in 0..4 {
        content.push_str(&format!(
            "Section {paragraph} of document {id}: evidence fragment {}.\n",
            id as u64 * 31 + paragraph
        ));
    }
    content
}
