//! Single-pass weighted assignment
//!
//! Each sentence goes to a split drawn at random from the splits that still
//! have room, weighted by their configured proportion. A split leaves the
//! draw as soon as it reaches its quota; once every split is full the
//! remaining input is left unread and counted as dropped.
//!
//! Quotas come from the pre-scan's quota basis, which counts blank lines that
//! terminate a sentence. A final sentence with no blank line after it is still
//! read, but it is not part of the basis.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

use super::{PartitionOutcome, Split};
use crate::config::SplitSizes;
use crate::error::{Result, SplitError};
use crate::reader::{Sentence, SentenceCount};
use crate::writer::SentenceSink;

/// Assign `sentences`, pre-scanned as `count`, to `sink`
pub fn partition<I, R, S>(
    sentences: I,
    count: SentenceCount,
    sizes: &SplitSizes,
    rng: &mut R,
    sink: &mut S,
) -> Result<PartitionOutcome>
where
    I: IntoIterator<Item = Result<Sentence>>,
    R: Rng + ?Sized,
    S: SentenceSink + ?Sized,
{
    let mut outcome = PartitionOutcome::from_count(count, sizes);
    let mut open: Vec<Split> = Vec::with_capacity(Split::ALL.len());
    for split in Split::ALL {
        let tally = outcome.tally(split);
        debug!(%split, quota = tally.quota, "Computed quota");
        if tally.is_full() {
            debug!(%split, "Quota is zero; split closed before assignment");
        } else {
            // WHY: Only splits with room enter the draw, so no draw is ever rejected and repeated
            open.push(split);
        }
    }
    sink.begin(outcome.expected_written());

    let mut sentences = sentences.into_iter();
    // WHY: Once every split is full nothing more can be written; the rest of the input stays unread
    while !open.is_empty() {
        let Some(sentence) = sentences.next() else {
            break;
        };
        let sentence = sentence?;

        let split = *open
            .choose_weighted(rng, |split| sizes.get(*split))
            .map_err(|e| SplitError::Sampling(e.to_string()))?;

        sink.write_sentence(split, &sentence)?;
        if outcome.record(split).is_full() {
            open.retain(|s| *s != split);
            debug!(%split, "Quota reached; split closed");
        }
    }

    if open.is_empty() && outcome.dropped() > 0 {
        info!(
            dropped = outcome.dropped(),
            "All splits full; remaining sentences dropped"
        );
    }
    Ok(outcome)
}
