//! Errors that can occur while handling the shared data model
//! (language lookups, config loading) rather than inside a specific
//! subsystem.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Supplied language code is not in the registry. Fatal: the whole
    /// run aborts rather than silently skipping the language.
    #[error("unknown language code: {code}")]
    UnknownLanguage { code: String },

    /// A declared input path does not exist. Fatal to the task that
    /// declared it.
    #[error("missing input: {path}")]
    MissingInput { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ErrorCode for CoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLanguage { .. } => error_code::UNKNOWN_LANGUAGE,
            Self::MissingInput { .. } => error_code::MISSING_INPUT,
            Self::Io { .. } => error_code::IO_ERROR,
            Self::InvalidConfig { .. } => error_code::INVALID_CONFIG,
        }
    }
}
