use serde::Serialize;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::config::{SplitConfig, Strategy};
use crate::error::{Result, SplitError};
use crate::partition::{PartitionOutcome, Split};

/// Per-split figures in a run report
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SplitStats {
    pub proportion: f64,
    pub quota: usize,
    pub written: usize,
}

/// Summary of one partitioning run
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub strategy: Strategy,
    pub seed: u64,
    pub total_sentences: usize,
    /// Count the quotas were computed from
    pub quota_basis: usize,
    pub train: SplitStats,
    pub dev: SplitStats,
    pub test: SplitStats,
    /// Sentences assigned to no split
    pub dropped: usize,
    pub processing_time_ms: u64,
}

impl SplitReport {
    pub fn new(config: &SplitConfig, outcome: &PartitionOutcome, elapsed: Duration) -> Self {
        let stats = |split: Split| {
            let tally = outcome.tally(split);
            SplitStats {
                proportion: config.sizes.get(split),
                quota: tally.quota,
                written: tally.written,
            }
        };
        Self {
            strategy: config.strategy,
            seed: config.seed,
            total_sentences: outcome.total,
            quota_basis: outcome.quota_basis,
            train: stats(Split::Train),
            dev: stats(Split::Dev),
            test: stats(Split::Test),
            dropped: outcome.dropped(),
            processing_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn split(&self, split: Split) -> &SplitStats {
        match split {
            Split::Train => &self.train,
            Split::Dev => &self.dev,
            Split::Test => &self.test,
        }
    }

    pub fn written(&self) -> usize {
        Split::ALL.iter().map(|s| self.split(*s).written).sum()
    }

    /// Write the report as pretty-printed JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SplitError::io(path, io::Error::from(e)))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SplitError::io(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| SplitError::io(path, e))
    }
}
