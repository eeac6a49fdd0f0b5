use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SplitError};
use crate::partition::Split;
use crate::reader::Sentence;

/// Serialize one sentence: tokens joined by single spaces, one line per
/// tokenized line, then exactly one blank line
pub fn write_sentence<W: Write>(out: &mut W, sentence: &Sentence) -> io::Result<()> {
    for line in sentence.lines() {
        let mut tokens = line.iter();
        if let Some(first) = tokens.next() {
            out.write_all(first.as_bytes())?;
            for token in tokens {
                out.write_all(b" ")?;
                out.write_all(token.as_bytes())?;
            }
        }
        out.write_all(b"\n")?;
    }
    out.write_all(b"\n")
}

/// Destination for sentences assigned to a split
pub trait SentenceSink {
    /// Called once before the first write with the number of sentences the
    /// run will write
    fn begin(&mut self, _expected: usize) {}

    fn write_sentence(&mut self, split: Split, sentence: &Sentence) -> Result<()>;

    /// Flush any buffered output
    fn finish(&mut self) -> Result<()>;
}

/// One writer per split
///
/// Writers are released when this value is dropped, so every exit path
/// (success, error, early stop) closes the underlying files.
#[derive(Debug)]
pub struct SplitWriters<W> {
    train: W,
    dev: W,
    test: W,
}

impl SplitWriters<BufWriter<File>> {
    /// Create (truncating) the three output files
    pub fn create<P: AsRef<Path>>(train: P, dev: P, test: P) -> Result<Self> {
        let open = |path: &Path| -> Result<BufWriter<File>> {
            debug!("Creating output file: {}", path.display());
            File::create(path)
                .map(BufWriter::new)
                .map_err(|e| SplitError::io(path, e))
        };
        Ok(Self {
            train: open(train.as_ref())?,
            dev: open(dev.as_ref())?,
            test: open(test.as_ref())?,
        })
    }
}

impl<W: Write> SplitWriters<W> {
    pub fn new(train: W, dev: W, test: W) -> Self {
        Self { train, dev, test }
    }

    pub fn get(&self, split: Split) -> &W {
        match split {
            Split::Train => &self.train,
            Split::Dev => &self.dev,
            Split::Test => &self.test,
        }
    }

    fn get_mut(&mut self, split: Split) -> &mut W {
        match split {
            Split::Train => &mut self.train,
            Split::Dev => &mut self.dev,
            Split::Test => &mut self.test,
        }
    }
}

impl<W: Write> SentenceSink for SplitWriters<W> {
    fn write_sentence(&mut self, split: Split, sentence: &Sentence) -> Result<()> {
        write_sentence(self.get_mut(split), sentence).map_err(|source| SplitError::Write { split, source })
    }

    fn finish(&mut self) -> Result<()> {
        for split in Split::ALL {
            self.get_mut(split)
                .flush()
                .map_err(|source| SplitError::Write { split, source })?;
        }
        Ok(())
    }
}
