use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, SplitError};
use crate::partition::Split;

/// Slack allowed when checking that proportions sum to at most one
const SUM_TOLERANCE: f64 = 1e-9;

/// Partitioning algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single pass, weighted random choice among splits that still have room
    #[default]
    Streaming,
    /// Load everything, shuffle once, slice by cumulative cutoffs
    Shuffle,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Streaming => write!(f, "streaming"),
            Strategy::Shuffle => write!(f, "shuffle"),
        }
    }
}

/// Target proportion of the corpus for each split
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitSizes {
    train: f64,
    dev: f64,
    test: f64,
}

impl SplitSizes {
    /// Validate and build; each size must lie strictly in (0, 1) and the
    /// three must not sum above 1
    pub fn new(train: f64, dev: f64, test: f64) -> Result<Self> {
        check_proportion("train_size", train)?;
        check_proportion("dev_size", dev)?;
        check_proportion("test_size", test)?;

        let sum = train + dev + test;
        if sum > 1.0 + SUM_TOLERANCE {
            return Err(SplitError::Configuration(format!(
                "train_size + dev_size + test_size must not exceed 1 (got {sum})"
            )));
        }
        Ok(Self { train, dev, test })
    }

    pub fn get(&self, split: Split) -> f64 {
        match split {
            Split::Train => self.train,
            Split::Dev => self.dev,
            Split::Test => self.test,
        }
    }
}

impl Default for SplitSizes {
    fn default() -> Self {
        Self {
            train: 0.8,
            dev: 0.1,
            test: 0.1,
        }
    }
}

/// Validate a single proportion
pub fn check_proportion(name: &str, value: f64) -> Result<f64> {
    // NaN fails both comparisons
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(SplitError::Configuration(format!(
            "{name} must be between 0 and 1 (got {value})"
        )))
    }
}

/// Everything needed to reproduce a split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub sizes: SplitSizes,
    pub seed: u64,
    pub strategy: Strategy,
}

impl SplitConfig {
    pub fn new(sizes: SplitSizes, seed: u64) -> Self {
        Self {
            sizes,
            seed,
            strategy: Strategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}
