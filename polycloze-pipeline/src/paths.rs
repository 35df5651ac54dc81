//! Conventional layout of the `build/` directory tree.
//!
//! Every task computes its inputs/outputs through this struct rather
//! than hardcoding path fragments, so the layout only needs to change
//! in one place.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BuildPaths {
    root: PathBuf,
}

impl BuildPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tatoeba_dir(&self) -> PathBuf {
        self.root.join("tatoeba")
    }

    pub fn sentences_archive(&self) -> PathBuf {
        self.tatoeba_dir().join("sentences.tar.bz2")
    }

    pub fn links_archive(&self) -> PathBuf {
        self.tatoeba_dir().join("links.tar.bz2")
    }

    pub fn raw_sentences_csv(&self) -> PathBuf {
        self.tatoeba_dir().join("sentences.csv")
    }

    pub fn raw_links_csv(&self) -> PathBuf {
        self.tatoeba_dir().join("links.csv")
    }

    /// Per-language, untokenized sentence partition: `build/sentences/{code}.tsv`.
    pub fn partitioned_sentences_dir(&self) -> PathBuf {
        self.root.join("sentences")
    }

    pub fn partitioned_sentences(&self, code: &str) -> PathBuf {
        self.partitioned_sentences_dir().join(format!("{code}.tsv"))
    }

    /// Tokenized per-language artifacts: `build/languages/{code}/`.
    pub fn language_dir(&self, code: &str) -> PathBuf {
        self.root.join("languages").join(code)
    }

    pub fn language_sentences_csv(&self, code: &str) -> PathBuf {
        self.language_dir(code).join("sentences.csv")
    }

    pub fn language_words_csv(&self, code: &str) -> PathBuf {
        self.language_dir(code).join("words.csv")
    }

    pub fn language_nonwords_log(&self, code: &str) -> PathBuf {
        self.root.join("logs").join("nonwords").join(format!("{code}.txt"))
    }

    /// Canonical per-pair link file: `build/links/{lo}-{hi}.csv`.
    pub fn links_dir(&self) -> PathBuf {
        self.root.join("links")
    }

    pub fn pair_links_csv(&self, lo: &str, hi: &str) -> PathBuf {
        self.links_dir().join(format!("{lo}-{hi}.csv"))
    }

    /// Difficulty Engine intermediate output: `build/difficulty/{l1}-{l2}/`.
    pub fn difficulty_dir(&self, l1: &str, l2: &str) -> PathBuf {
        self.root.join("difficulty").join(format!("{l1}-{l2}"))
    }

    pub fn difficulty_sentences_db(&self, l1: &str, l2: &str) -> PathBuf {
        self.difficulty_dir(l1, l2).join("sentences.db")
    }

    pub fn difficulty_words_db(&self, l1: &str, l2: &str) -> PathBuf {
        self.difficulty_dir(l1, l2).join("words.db")
    }

    pub fn difficulty_skipped_csv(&self, l1: &str, l2: &str) -> PathBuf {
        self.difficulty_dir(l1, l2).join("skipped.csv")
    }

    pub fn courses_dir(&self) -> PathBuf {
        self.root.join("courses")
    }

    pub fn course_db(&self, l1: &str, l2: &str) -> PathBuf {
        self.courses_dir().join(format!("{l1}-{l2}.db"))
    }
}
