// Integration test utilities and common code

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Temporary directory holding an input corpus and the three split outputs
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Write a corpus file with the given raw content
    pub fn create_corpus(&self, name: &str, content: &str) -> PathBuf {
        let file_path = self.root_path.join(name);
        fs::write(&file_path, content).expect("Failed to write corpus file");
        file_path
    }

    /// Write a corpus of `n` distinct two-line sentences
    pub fn create_numbered_corpus(&self, name: &str, n: usize) -> PathBuf {
        self.create_corpus(name, &numbered_corpus(n))
    }

    /// Output path for a split under an optional run prefix
    pub fn output(&self, prefix: &str, split: &str) -> PathBuf {
        self.root_path.join(format!("{prefix}{split}.tag"))
    }

    /// Run the binary with `input`, the three `prefix` outputs, then `extra`
    pub fn run(&self, input: &Path, prefix: &str, extra: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_tagsplit"))
            .arg(input)
            .arg(self.output(prefix, "train"))
            .arg(self.output(prefix, "dev"))
            .arg(self.output(prefix, "test"))
            .args(extra)
            .arg("--no-progress")
            .output()
            .expect("Failed to run tagsplit")
    }

    pub fn read_output(&self, prefix: &str, split: &str) -> String {
        fs::read_to_string(self.output(prefix, split)).expect("Failed to read split output")
    }
}

pub fn numbered_corpus(n: usize) -> String {
    (0..n)
        .map(|i| format!("word{i} NN B-NP\n. PUNCT O\n\n"))
        .collect()
}

/// Number of sentences in serialized output (one blank line each)
pub fn sentence_count(text: &str) -> usize {
    text.matches("\n\n").count()
}
