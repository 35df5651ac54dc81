use std::fs;

use polycloze_core::collab::DirectoryMigrationSource;
use polycloze_storage::{connection, migration, COURSE_SCHEMA_SQL};

#[test]
fn fresh_database_reaches_course_schema() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("0001_course_schema.sql"), COURSE_SCHEMA_SQL).unwrap();

    let mut conn = connection::open_in_memory().unwrap();
    let source = DirectoryMigrationSource::new(dir.path());
    migration::apply(&mut conn, &source).unwrap();

    assert_eq!(migration::current_version(&conn).unwrap(), 1);

    for table in ["language", "word", "sentence", "translation", "translates", "contains"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap_or_else(|_| panic!("table {table} should exist"));
        assert_eq!(count, 0);
    }
}

#[test]
fn rerunning_migration_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("0001_course_schema.sql"), COURSE_SCHEMA_SQL).unwrap();

    let mut conn = connection::open_in_memory().unwrap();
    let source = DirectoryMigrationSource::new(dir.path());
    migration::apply(&mut conn, &source).unwrap();
    migration::apply(&mut conn, &source).unwrap();

    assert_eq!(migration::current_version(&conn).unwrap(), 1);
}
