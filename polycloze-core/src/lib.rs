//! # polycloze-core
//!
//! Foundation crate for the Polycloze course builder.
//! Defines the data model (sentences, words, links), the error
//! hierarchy, build configuration, the language registry, and the
//! trait boundaries for every external collaborator (tokenizer, word
//! classifier, archive source, migration source).
//!
//! Every other crate in the workspace depends on this one.

pub mod collab;
pub mod config;
pub mod constants;
pub mod errors;
pub mod registry;
pub mod tracing_setup;
pub mod types;

pub use config::BuildConfig;
pub use errors::{CoreError, ErrorCode};
pub use types::{Language, Link, Sentence, Word};
