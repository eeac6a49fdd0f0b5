use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::partition::Split;

/// Errors produced while configuring or running a split
#[derive(Debug, Error)]
pub enum SplitError {
    /// Proportions are out of range or oversubscribed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input could not be read or an output file could not be created
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a sentence to one of the split outputs failed
    #[error("failed writing to {split} output: {source}")]
    Write {
        split: Split,
        #[source]
        source: io::Error,
    },

    /// The weighted sampler refused the bucket weights
    #[error("sampling error: {0}")]
    Sampling(String),
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SplitError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
