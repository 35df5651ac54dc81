//! Errors raised by the external-collaborator trait boundaries
//! (archive extraction, schema migration).

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to extract {archive} into {destination}: {source}")]
    Extraction {
        archive: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for ArchiveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::MISSING_INPUT,
            Self::Extraction { .. } => error_code::IO_ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("migration file name does not match the {{version}}_*.sql contract: {name}")]
    MalformedFilename { name: String },

    #[error("migration {path} embeds version {embedded} but its filename declares {declared}")]
    VersionMismatch {
        path: PathBuf,
        declared: u32,
        embedded: u32,
    },

    #[error("failed to read migration directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        error_code::SCHEMA_ERROR
    }
}
