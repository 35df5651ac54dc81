use std::path::PathBuf;

use polycloze_core::errors::error_code::{self, ErrorCode};

use crate::task::TaskId;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("missing input: {path}")]
    MissingInput { path: PathBuf },

    #[error("task {id} failed: {source}")]
    TaskFailed {
        id: TaskId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error while checking freshness of {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scheduler worker thread panicked")]
    WorkerPanicked,
}

impl ErrorCode for SchedulerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => error_code::MISSING_INPUT,
            Self::TaskFailed { .. } => error_code::TASK_FAILED,
            Self::Io { .. } => error_code::IO_ERROR,
            Self::WorkerPanicked => error_code::TASK_FAILED,
        }
    }
}
