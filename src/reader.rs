use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{Result, SplitError};

/// Buffer size for corpus reads (default 8KB)
// WHY: Shared by the pre-scan and the sentence reader so both passes read the file the same way
const READ_BUFFER_SIZE: usize = 8192;

/// One sentence of a tabular corpus: an ordered list of tokenized lines
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sentence {
    lines: Vec<Vec<String>>,
}

impl Sentence {
    pub fn new(lines: Vec<Vec<String>>) -> Self {
        Self { lines }
    }

    /// Build a sentence from raw lines, splitting each on whitespace
    pub fn from_raw_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            lines: lines.into_iter().map(tokenize).collect(),
        }
    }

    pub fn lines(&self) -> &[Vec<String>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Lazy sentence iterator over a blank-line-delimited corpus
///
/// A whitespace-only line closes the current sentence; runs of blank lines
/// never yield empty sentences. A sentence still pending at end of input is
/// yielded even without a trailing blank line.
pub struct CorpusReader<R> {
    reader: R,
    source: PathBuf,
    buf: String,
    line_no: u64,
    done: bool,
}

impl CorpusReader<BufReader<File>> {
    /// Open `path` for sentence-by-sentence reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening corpus: {}", path.display());
        let file = File::open(path).map_err(|e| SplitError::io(path, e))?;
        Ok(Self::new(
            BufReader::with_capacity(READ_BUFFER_SIZE, file),
            path,
        ))
    }
}

impl<R: BufRead> CorpusReader<R> {
    /// Wrap any buffered reader; `source` labels errors
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            source: source.into(),
            buf: String::new(),
            line_no: 0,
            done: false,
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf).map_err(|e| {
            SplitError::io(
                &self.source,
                std::io::Error::new(e.kind(), format!("line {}: {}", self.line_no + 1, e)),
            )
        })?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n > 0)
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut lines = Vec::new();
        loop {
            match self.read_line() {
                Ok(true) => {
                    let tokens = tokenize(&self.buf);
                    if !tokens.is_empty() {
                        lines.push(tokens);
                    } else if !lines.is_empty() {
                        return Some(Ok(Sentence::new(lines)));
                    }
                }
                Ok(false) => {
                    self.done = true;
                    return (!lines.is_empty()).then(|| Ok(Sentence::new(lines)));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Result of a pre-scan over a corpus file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentenceCount {
    /// Blank lines that close a sentence, or 1 when content exists but no
    /// blank line ever closes it; quotas are computed from this value
    pub quota_basis: usize,
    /// Sentences [`CorpusReader`] will yield for the same input
    pub sentences: usize,
}

impl SentenceCount {
    /// A count where every sentence is terminated, as for an in-memory corpus
    pub fn exact(sentences: usize) -> Self {
        Self {
            quota_basis: sentences,
            sentences,
        }
    }
}

/// Pre-scan `path` without tokenizing it
///
/// The quota basis counts blank lines that terminate a sentence, so a final
/// sentence with no trailing blank line is not part of it. The reader-side
/// sentence count is tracked in the same pass to keep the dropped count exact.
pub fn count_sentences<P: AsRef<Path>>(path: P) -> Result<SentenceCount> {
    let path = path.as_ref();
    let start_time = Instant::now();
    let file = File::open(path).map_err(|e| SplitError::io(path, e))?;
    let count = count_sentences_in(BufReader::with_capacity(READ_BUFFER_SIZE, file))
        .map_err(|e| SplitError::io(path, e))?;

    info!(
        "Pre-scanned {}: {} sentences, quota basis {} in {}ms",
        path.display(),
        count.sentences,
        count.quota_basis,
        start_time.elapsed().as_millis()
    );
    Ok(count)
}

fn count_sentences_in<R: BufRead>(mut reader: R) -> std::io::Result<SentenceCount> {
    let mut buf = String::new();
    let mut terminated = 0;
    let mut in_sentence = false;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let blank = buf.trim().is_empty();
        if blank && in_sentence {
            terminated += 1;
        }
        in_sentence = !blank;
    }

    let sentences = terminated + usize::from(in_sentence);
    // WHY: Content that no blank line ever closes still counts as one sentence for quotas
    let quota_basis = if terminated == 0 && sentences > 0 {
        1
    } else {
        terminated
    };
    Ok(SentenceCount {
        quota_basis,
        sentences,
    })
}

/// Read the whole corpus into memory
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Sentence>> {
    let path = path.as_ref();
    let start_time = Instant::now();
    let corpus = CorpusReader::open(path)?.collect::<Result<Vec<_>>>()?;

    info!(
        "Loaded {}: {} sentences in {}ms",
        path.display(),
        corpus.len(),
        start_time.elapsed().as_millis()
    );
    Ok(corpus)
}
