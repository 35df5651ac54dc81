//! Build configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DIFFICULTY_HEAP_SIZE, LINK_PARTITION_LRU_CAP, MAX_EXAMPLES};
use crate::errors::CoreError;

/// Settings for one course-builder run.
///
/// Mostly-optional and `serde`-deserializable so it can be loaded from
/// an optional TOML file and have CLI flags layered on top; each field
/// has an `effective_*()` accessor supplying the spec's default when
/// unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Root directory the pipeline reads archives from and writes
    /// intermediate/course databases under.
    pub build_root: Option<PathBuf>,

    /// Worker thread count for the scheduler. `None` or `Some(0)` means
    /// `std::thread::available_parallelism()`.
    pub workers: Option<usize>,

    /// Force every task to run even if its outputs are newer than its
    /// inputs (the `-B` flag).
    pub force_rebuild: bool,

    pub max_examples: Option<usize>,
    pub heap_k: Option<usize>,
    pub lru_cap: Option<usize>,
}

impl BuildConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|source| CoreError::InvalidConfig {
            message: source.to_string(),
        })
    }

    pub fn effective_build_root(&self) -> PathBuf {
        self.build_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("build"))
    }

    pub fn effective_workers(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }

    pub fn effective_max_examples(&self) -> usize {
        self.max_examples.unwrap_or(MAX_EXAMPLES)
    }

    pub fn effective_heap_k(&self) -> usize {
        self.heap_k.unwrap_or(DIFFICULTY_HEAP_SIZE)
    }

    pub fn effective_lru_cap(&self) -> usize {
        self.lru_cap.unwrap_or(LINK_PARTITION_LRU_CAP)
    }
}
