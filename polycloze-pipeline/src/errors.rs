//! Pipeline-layer errors: everything a task body can fail with, beyond
//! what its collaborators (`polycloze_storage`, `polycloze_core`)
//! already report.

use std::path::PathBuf;

use polycloze_core::errors::{ArchiveError, CoreError, ErrorCode};
use polycloze_core::errors::error_code;
use polycloze_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row in {path}: {detail}")]
    MalformedRow { path: PathBuf, detail: String },

    #[error("csv error reading {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid tokens JSON in {path}: {source}")]
    TokensJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Core(inner) => inner.error_code(),
            Self::Archive(inner) => inner.error_code(),
            Self::Storage(inner) => inner.error_code(),
            Self::Sqlite(_) => error_code::PIPELINE_ERROR,
            Self::Read { .. }
            | Self::Write { .. }
            | Self::MalformedRow { .. }
            | Self::Csv { .. }
            | Self::TokensJson { .. } => error_code::PIPELINE_ERROR,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
