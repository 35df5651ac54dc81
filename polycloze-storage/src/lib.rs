//! SQLite persistence for the course builder: connection opening with
//! shared pragmas, migration application, the intermediate and course
//! database schemas, query helpers, and a batched writer thread for
//! the Course Assembler's bulk inserts.

pub mod batch;
pub mod connection;
pub mod errors;
pub mod migration;
pub mod queries;
pub mod schema;

pub use batch::{BatchCommand, BatchWriter};
pub use errors::StorageError;

/// Embedded course-database migration, applied via
/// [`polycloze_core::collab::DirectoryMigrationSource`] pointed at a
/// directory this file has been written into, or directly via
/// [`rusqlite::Connection::execute_batch`] when no collaborator
/// override is configured.
pub const COURSE_SCHEMA_SQL: &str = include_str!("../migrations/0001_course_schema.sql");
