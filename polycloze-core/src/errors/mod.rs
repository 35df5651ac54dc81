//! Error hierarchy shared across the workspace.
//!
//! Each crate defines its own `thiserror`-derived enum for its own
//! failure modes and implements [`ErrorCode`] on it, following the
//! same split the teacher codebase uses for its per-subsystem error
//! enums (one file per concern, a shared trait tying them together).

mod collab_error;
mod core_error;
pub mod error_code;

pub use collab_error::{ArchiveError, SchemaError};
pub use core_error::CoreError;
pub use error_code::ErrorCode;
