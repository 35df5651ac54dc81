//! Schema migration discovery.

use std::fs;
use std::path::PathBuf;

use crate::errors::SchemaError;

/// One migration: the schema version it brings the database to, the
/// file it came from, and the SQL to execute.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub path: PathBuf,
    pub sql: String,
}

pub trait MigrationSource {
    /// All migrations with a version greater than `current_version`,
    /// sorted ascending by version.
    fn pending(&self, current_version: u32) -> Result<Vec<Migration>, SchemaError>;
}

/// Scans a directory of `{version}_*.sql` files, e.g. `0001_initial.sql`.
/// The leading numeric component before the first underscore is the
/// migration's version; it must parse as `u32` or the file is rejected.
pub struct DirectoryMigrationSource {
    pub dir: PathBuf,
}

impl DirectoryMigrationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn parse_version(name: &str) -> Option<u32> {
        let prefix = name.split('_').next()?;
        prefix.parse().ok()
    }
}

impl MigrationSource for DirectoryMigrationSource {
    fn pending(&self, current_version: u32) -> Result<Vec<Migration>, SchemaError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| SchemaError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut migrations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("sql") {
                continue;
            }
            let file_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let version = Self::parse_version(&file_name).ok_or_else(|| SchemaError::MalformedFilename {
                name: file_name.clone(),
            })?;
            if version <= current_version {
                continue;
            }
            let sql = fs::read_to_string(&path).map_err(|source| SchemaError::Io {
                path: path.clone(),
                source,
            })?;
            migrations.push(Migration { version, path, sql });
        }

        migrations.sort_by_key(|m| m.version);
        Ok(migrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn parses_leading_numeric_version() {
        assert_eq!(DirectoryMigrationSource::parse_version("0001_initial"), Some(1));
        assert_eq!(DirectoryMigrationSource::parse_version("0012_add_index"), Some(12));
        assert_eq!(DirectoryMigrationSource::parse_version("bad"), None);
    }

    #[test]
    fn returns_migrations_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for (name, sql) in [
            ("0001_initial.sql", "create table a (id integer);"),
            ("0003_third.sql", "create table c (id integer);"),
            ("0002_second.sql", "create table b (id integer);"),
        ] {
            let mut f = File::create(dir.path().join(name)).unwrap();
            f.write_all(sql.as_bytes()).unwrap();
        }

        let source = DirectoryMigrationSource::new(dir.path());
        let pending = source.pending(1).unwrap();
        let versions: Vec<_> = pending.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![2, 3]);
    }

    #[test]
    fn rejects_malformed_filename() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("not_versioned.sql")).unwrap();
        let source = DirectoryMigrationSource::new(dir.path());
        assert!(matches!(
            source.pending(0),
            Err(SchemaError::MalformedFilename { .. })
        ));
    }
}
