pub mod config;
pub mod error;
pub mod partition;
pub mod progress;
pub mod reader;
pub mod stats;
pub mod writer;

// Re-export main types for convenient access
pub use config::{SplitConfig, SplitSizes, Strategy};
pub use error::SplitError;
pub use partition::{PartitionOutcome, Split, Splitter};
pub use reader::{count_sentences, read_corpus, CorpusReader, Sentence, SentenceCount};
pub use stats::SplitReport;
pub use writer::{write_sentence, SentenceSink, SplitWriters};
