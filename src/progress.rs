//! Terminal progress for long splits

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::Result;
use crate::partition::Split;
use crate::reader::Sentence;
use crate::writer::SentenceSink;

/// Sink wrapper that advances a progress bar for every sentence written
///
/// The bar is created once the partitioner announces how many sentences it
/// will write, so its length is the sum of the quotas capped by the input.
pub struct ProgressReporter<S> {
    inner: S,
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl<S: SentenceSink> ProgressReporter<S> {
    /// Wrap `inner`; when `quiet` no bar is drawn
    pub fn new(inner: S, quiet: bool) -> Self {
        Self {
            inner,
            progress_bar: None,
            quiet,
        }
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.as_ref().map_or(0, |pb| pb.position())
    }

    pub fn length(&self) -> Option<u64> {
        self.progress_bar.as_ref().and_then(|pb| pb.length())
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SentenceSink> SentenceSink for ProgressReporter<S> {
    fn begin(&mut self, expected: usize) {
        self.inner.begin(expected);
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(expected as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sentences {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        self.progress_bar = Some(pb);
    }

    fn write_sentence(&mut self, split: Split, sentence: &Sentence) -> Result<()> {
        self.inner.write_sentence(split, sentence)?;
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.finish()?;
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
        Ok(())
    }
}
