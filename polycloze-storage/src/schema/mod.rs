//! Ad hoc schemas for the two intermediate databases the Difficulty
//! Engine writes (`sentences.db`, `words.db`). These aren't migrated —
//! each build produces them fresh, so there's no prior version to
//! reconcile.

use rusqlite::Connection;

use crate::errors::StorageError;

pub fn create_sentences_db(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sentence (
            id INTEGER PRIMARY KEY,
            text TEXT NOT NULL,
            tatoeba_id INTEGER NOT NULL UNIQUE,
            tokens TEXT NOT NULL,
            difficulty INTEGER NOT NULL
        );",
    )?;
    Ok(())
}

pub fn create_words_db(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS word (
            surface TEXT PRIMARY KEY,
            difficulty INTEGER NOT NULL
        );",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_db_accepts_a_row() {
        let conn = Connection::open_in_memory().unwrap();
        create_sentences_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO sentence (text, tatoeba_id, tokens, difficulty) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params!["Hi.", 1, "[\"Hi\",\".\"]", 0],
        )
        .unwrap();
    }

    #[test]
    fn words_db_rejects_duplicate_surface() {
        let conn = Connection::open_in_memory().unwrap();
        create_words_db(&conn).unwrap();
        conn.execute("INSERT INTO word (surface, difficulty) VALUES ('cat', 1)", [])
            .unwrap();
        let result = conn.execute("INSERT INTO word (surface, difficulty) VALUES ('cat', 2)", []);
        assert!(result.is_err());
    }
}
