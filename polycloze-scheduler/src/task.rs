//! Task identity and the trait every scheduled unit of work implements.

use std::path::PathBuf;

/// A stable, hashable task identity. Equal identities deduplicate:
/// adding the same parameterised task twice registers it once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskId {
    DecompressSentences,
    DecompressLinks,
    PrepareSentences,
    PartitionLinks,
    TokenizeLanguage(String),
    ComputeDifficulty(String, String),
    BuildCourse(String, String),
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecompressSentences => write!(f, "DecompressSentences"),
            Self::DecompressLinks => write!(f, "DecompressLinks"),
            Self::PrepareSentences => write!(f, "PrepareSentences"),
            Self::PartitionLinks => write!(f, "PartitionLinks"),
            Self::TokenizeLanguage(code) => write!(f, "TokenizeLanguage({code})"),
            Self::ComputeDifficulty(l1, l2) => write!(f, "ComputeDifficulty({l1}, {l2})"),
            Self::BuildCourse(l1, l2) => write!(f, "BuildCourse({l1}, {l2})"),
        }
    }
}

/// A unit of scheduled work. Declares its own identity and the
/// filesystem paths its freshness check compares; `run` performs the
/// actual work once the scheduler has decided it's due.
///
/// Implementors must be `Send`: the scheduler may run a task on any
/// worker thread.
pub trait Task: Send {
    fn id(&self) -> TaskId;

    /// Paths whose newest mtime determines whether this task is stale.
    /// A missing input is always a fatal error.
    fn inputs(&self) -> Vec<PathBuf>;

    /// Paths whose oldest mtime determines whether this task is
    /// stale. A missing output is treated as infinitely old.
    fn outputs(&self) -> Vec<PathBuf>;

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
