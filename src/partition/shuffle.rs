//! Shuffle-and-slice over a fully loaded corpus
//!
//! The corpus is permuted once and then cut at cumulative cutoffs
//! `train`, `train + dev`, `train + dev + test`. Anything past the last
//! cutoff is dropped.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{PartitionOutcome, Split};
use crate::config::SplitSizes;
use crate::error::Result;
use crate::reader::Sentence;
use crate::writer::SentenceSink;

/// Shuffle `corpus` and write each slice to its split
pub fn partition<R, S>(
    mut corpus: Vec<Sentence>,
    sizes: &SplitSizes,
    rng: &mut R,
    sink: &mut S,
) -> Result<PartitionOutcome>
where
    R: Rng + ?Sized,
    S: SentenceSink + ?Sized,
{
    let mut outcome = PartitionOutcome::new(corpus.len(), sizes);
    let train_cutoff = outcome.tally(Split::Train).quota;
    let dev_cutoff = train_cutoff + outcome.tally(Split::Dev).quota;
    let test_cutoff = dev_cutoff + outcome.tally(Split::Test).quota;
    debug!(
        train_cutoff,
        dev_cutoff, test_cutoff, "Computed cumulative cutoffs"
    );
    sink.begin(outcome.expected_written());

    corpus.shuffle(rng);

    for (position, sentence) in corpus.iter().enumerate() {
        let split = if position < train_cutoff {
            Split::Train
        } else if position < dev_cutoff {
            Split::Dev
        } else if position < test_cutoff {
            Split::Test
        } else {
            break;
        };
        sink.write_sentence(split, sentence)?;
        outcome.record(split);
    }
    Ok(outcome)
}
