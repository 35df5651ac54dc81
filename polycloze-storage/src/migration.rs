//! Applies pending migrations from a [`MigrationSource`] to a course
//! database connection, verifying the embedded `PRAGMA user_version`
//! actually lands on the version its filename declared.

use polycloze_core::collab::MigrationSource;
use polycloze_core::errors::SchemaError;
use rusqlite::Connection;

use crate::errors::StorageError;

pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    let version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Runs every pending migration in ascending order, each inside its
/// own transaction, and checks that the schema's declared version
/// after running matches the filename's declared version.
pub fn apply(conn: &mut Connection, source: &dyn MigrationSource) -> Result<(), StorageError> {
    let current = current_version(conn)?;
    let pending = source.pending(current)?;

    for migration in pending {
        let tx = conn.transaction()?;
        tx.execute_batch(&migration.sql)?;
        let embedded = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if embedded != migration.version {
            return Err(SchemaError::VersionMismatch {
                path: migration.path,
                declared: migration.version,
                embedded,
            }
            .into());
        }
        tx.commit()?;
    }

    Ok(())
}
