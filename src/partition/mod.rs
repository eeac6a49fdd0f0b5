//! Assignment of sentences to the train, dev and test splits
//!
//! Two strategies share the same inputs and the same [`PartitionOutcome`]:
//! - [`streaming`]: one pass over the input, weighted random choice among
//!   splits that are still open, constant memory.
//! - [`shuffle`]: materialize the corpus, shuffle once, slice by cumulative
//!   cutoffs.
//!
//! Quotas are always `round(basis * proportion)` with ties rounded to even,
//! where the basis is the corpus size (shuffle) or the number of blank lines
//! that terminate a sentence (streaming pre-scan).

pub mod shuffle;
pub mod streaming;

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::config::{SplitConfig, SplitSizes, Strategy};
use crate::error::Result;
use crate::reader::{count_sentences, read_corpus, CorpusReader, SentenceCount};
use crate::stats::SplitReport;
use crate::writer::{SentenceSink, SplitWriters};

/// One of the three output buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of sentences a split should receive out of `total`
pub fn quota(total: usize, proportion: f64) -> usize {
    (total as f64 * proportion).round_ties_even() as usize
}

/// Quota and running count for one split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Tally {
    pub quota: usize,
    pub written: usize,
}

impl Tally {
    pub fn is_full(&self) -> bool {
        self.written >= self.quota
    }
}

/// Final counts of a partitioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartitionOutcome {
    /// Sentences available for assignment
    pub total: usize,
    /// Count the quotas were computed from
    pub quota_basis: usize,
    tallies: [Tally; 3],
}

impl PartitionOutcome {
    /// Start a run over `total` sentences with independently rounded quotas
    pub fn new(total: usize, sizes: &SplitSizes) -> Self {
        Self::from_count(SentenceCount::exact(total), sizes)
    }

    /// Start a run whose quotas come from a pre-scan's basis
    pub fn from_count(count: SentenceCount, sizes: &SplitSizes) -> Self {
        Self {
            total: count.sentences,
            quota_basis: count.quota_basis,
            tallies: Split::ALL.map(|split| Tally {
                quota: quota(count.quota_basis, sizes.get(split)),
                written: 0,
            }),
        }
    }

    pub fn tally(&self, split: Split) -> Tally {
        self.tallies[split as usize]
    }

    /// Count one sentence written to `split`; returns the updated tally
    pub(crate) fn record(&mut self, split: Split) -> Tally {
        let tally = &mut self.tallies[split as usize];
        tally.written += 1;
        debug_assert!(tally.written <= tally.quota, "{split} exceeded its quota");
        *tally
    }

    pub fn written(&self) -> usize {
        self.tallies.iter().map(|t| t.written).sum()
    }

    /// Sentences that were read (or counted) but assigned nowhere
    pub fn dropped(&self) -> usize {
        self.total.saturating_sub(self.written())
    }

    /// Sentences the run will write once it completes
    pub fn expected_written(&self) -> usize {
        let quotas: usize = self.tallies.iter().map(|t| t.quota).sum();
        quotas.min(self.total)
    }
}

/// Runs a configured split from an input path into any sink
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Partition `input` into `sink` and flush it
    pub fn run<S: SentenceSink>(&self, input: &Path, sink: &mut S) -> Result<SplitReport> {
        let start_time = Instant::now();
        let SplitConfig {
            sizes,
            seed,
            strategy,
        } = self.config;
        // WHY: A named generator keeps the same seed producing the same split across rand releases
        let mut rng = ChaCha12Rng::seed_from_u64(seed);

        info!(%strategy, seed, "Partitioning {}", input.display());

        let outcome = match strategy {
            Strategy::Streaming => {
                let count = count_sentences(input)?;
                let sentences = CorpusReader::open(input)?;
                streaming::partition(sentences, count, &sizes, &mut rng, sink)?
            }
            Strategy::Shuffle => {
                let corpus = read_corpus(input)?;
                shuffle::partition(corpus, &sizes, &mut rng, sink)?
            }
        };
        sink.finish()?;

        let report = SplitReport::new(&self.config, &outcome, start_time.elapsed());
        info!(
            written = outcome.written(),
            dropped = outcome.dropped(),
            "Partitioning complete in {}ms",
            report.processing_time_ms
        );
        Ok(report)
    }

    /// Partition `input` into three freshly created files
    pub fn split_files<P: AsRef<Path>>(
        &self,
        input: P,
        train: P,
        dev: P,
        test: P,
    ) -> Result<SplitReport> {
        let mut writers = SplitWriters::create(train, dev, test)?;
        self.run(input.as_ref(), &mut writers)
    }
}
