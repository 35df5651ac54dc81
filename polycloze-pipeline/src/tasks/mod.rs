//! Task bodies: one module per [`polycloze_scheduler::TaskId`] variant.

pub mod build_course;
pub mod compute_difficulty;
pub mod decompress;
pub mod partition_links;
pub mod prepare_sentences;
pub mod tokenize;

pub use build_course::BuildCourseTask;
pub use compute_difficulty::ComputeDifficultyTask;
pub use decompress::{DecompressLinksTask, DecompressSentencesTask};
pub use partition_links::PartitionLinksTask;
pub use prepare_sentences::PrepareSentencesTask;
pub use tokenize::TokenizeLanguageTask;
