//! Storage-layer errors.

use std::path::PathBuf;

use polycloze_core::errors::{ErrorCode, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to publish database to {path}: {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("batch writer channel disconnected")]
    WriterDisconnected,

    #[error("batch writer thread panicked")]
    WriterPanicked,
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(inner) => inner.error_code(),
            Self::Sqlite(_) | Self::Publish { .. } | Self::WriterDisconnected | Self::WriterPanicked => {
                "STORAGE_ERROR"
            }
        }
    }
}
