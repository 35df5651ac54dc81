//! Course-database read/write helpers used by the Course Assembler.
//!
//! Each function takes a raw connection rather than a pool handle —
//! the assembler owns its connection for the lifetime of one build and
//! runs single-threaded, so there is no routing to do here.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;

use crate::errors::StorageError;

pub fn insert_language(conn: &Connection, id: i64, code: &str, name: &str, bcp47: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO language (id, code, name, bcp47) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id, code, name, bcp47],
    )?;
    Ok(())
}

/// `rows` are `(source, target)` tatoeba ids, already oriented so that
/// `source` is the L2 side (the sentence in `sentence`) and `target`
/// is the L1 side (the sentence in `translation`).
pub fn insert_translates(conn: &Connection, rows: &[(i64, i64)]) -> Result<(), StorageError> {
    let mut stmt = conn.prepare_cached("INSERT OR IGNORE INTO translates (source, target) VALUES (?1, ?2)")?;
    for (source, target) in rows {
        stmt.execute(rusqlite::params![source, target])?;
    }
    Ok(())
}

/// Attaches `sentences_db_path` and copies every row into `sentence`,
/// renaming `difficulty` to `frequency_class` as it crosses over (the
/// Difficulty Engine's output column becomes the course DB's
/// frequency_class column, per the course schema).
pub fn copy_sentences_from(conn: &Connection, sentences_db_path: &Path) -> Result<(), StorageError> {
    conn.execute(
        "ATTACH DATABASE ?1 AS diff_sentences",
        rusqlite::params![sentences_db_path.to_string_lossy()],
    )?;
    let result = conn.execute(
        "INSERT INTO sentence (tatoeba_id, text, tokens, frequency_class)
         SELECT tatoeba_id, text, tokens, difficulty FROM diff_sentences.sentence",
        [],
    );
    conn.execute("DETACH DATABASE diff_sentences", [])?;
    result?;
    Ok(())
}

pub fn copy_words_from(conn: &Connection, words_db_path: &Path) -> Result<(), StorageError> {
    conn.execute(
        "ATTACH DATABASE ?1 AS diff_words",
        rusqlite::params![words_db_path.to_string_lossy()],
    )?;
    let result = conn.execute(
        "INSERT INTO word (word, frequency_class)
         SELECT surface, difficulty FROM diff_words.word",
        [],
    );
    conn.execute("DETACH DATABASE diff_words", [])?;
    result?;
    Ok(())
}

/// Inserts `translation(tatoeba_id, text)` for every L1 sentence whose
/// id appears as a `translates.target`. `l1_sentences` maps a tatoeba
/// id to its text.
pub fn insert_reachable_translations(
    conn: &Connection,
    l1_sentences: &HashMap<i64, String>,
) -> Result<(), StorageError> {
    let targets: Vec<i64> = conn
        .prepare("SELECT DISTINCT target FROM translates")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare_cached("INSERT OR IGNORE INTO translation (tatoeba_id, text) VALUES (?1, ?2)")?;
    for target in targets {
        if let Some(text) = l1_sentences.get(&target) {
            stmt.execute(rusqlite::params![target, text])?;
        }
    }
    Ok(())
}

/// Batched `surface -> word.id` lookup, chunked to stay well under
/// SQLite's default bound-parameter limit.
pub fn lookup_word_ids(conn: &Connection, surfaces: &[String]) -> Result<HashMap<String, i64>, StorageError> {
    const CHUNK: usize = 500;
    let mut out = HashMap::with_capacity(surfaces.len());
    for chunk in surfaces.chunks(CHUNK) {
        let placeholders = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!("SELECT id, word FROM word WHERE word IN ({placeholders})");
        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> = chunk.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
        let rows = stmt.query_map(params.as_slice(), |row| {
            let id: i64 = row.get(0)?;
            let word: String = row.get(1)?;
            Ok((word, id))
        })?;
        for row in rows {
            let (word, id) = row?;
            out.insert(word, id);
        }
    }
    Ok(out)
}

pub fn insert_contains(conn: &Connection, rows: &[(i64, i64)]) -> Result<(), StorageError> {
    let mut stmt = conn.prepare_cached("INSERT OR IGNORE INTO contains (sentence, word) VALUES (?1, ?2)")?;
    for (sentence_id, word_id) in rows {
        stmt.execute(rusqlite::params![sentence_id, word_id])?;
    }
    Ok(())
}

/// Bumps `word.frequency_class` up to the minimum `sentence.frequency_class`
/// among the sentences it appears in, for words that never were the
/// hardest word of any sentence they appear in.
pub fn bump_frequency_classes(conn: &Connection) -> Result<usize, StorageError> {
    let changed = conn.execute(
        "UPDATE word
         SET frequency_class = (
             SELECT MIN(s.frequency_class)
             FROM contains c JOIN sentence s ON s.id = c.sentence
             WHERE c.word = word.id
         )
         WHERE id NOT IN (
             SELECT c.word
             FROM contains c
             JOIN sentence s ON s.id = c.sentence
             WHERE s.frequency_class = word.frequency_class
         )
         AND (
             SELECT MIN(s.frequency_class)
             FROM contains c JOIN sentence s ON s.id = c.sentence
             WHERE c.word = word.id
         ) > word.frequency_class",
        [],
    )?;
    Ok(changed)
}

/// Rebuilds `contains` keeping only edges where the sentence is no
/// harder than the word.
pub fn recap_contains(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM contains
         WHERE (sentence, word) NOT IN (
             SELECT c.sentence, c.word
             FROM contains c
             JOIN sentence s ON s.id = c.sentence
             JOIN word w ON w.id = c.word
             WHERE s.frequency_class <= w.frequency_class
         )",
        [],
    )?;
    Ok(())
}

/// Transitive orphan pruning, per the shrink phase's documented order.
pub fn prune_orphans(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM sentence WHERE id NOT IN (SELECT sentence FROM contains)",
        [],
    )?;
    conn.execute(
        "DELETE FROM translates WHERE source NOT IN (SELECT tatoeba_id FROM sentence)",
        [],
    )?;
    conn.execute(
        "DELETE FROM translation WHERE tatoeba_id NOT IN (SELECT target FROM translates)",
        [],
    )?;
    conn.execute(
        "DELETE FROM translates WHERE target NOT IN (SELECT tatoeba_id FROM translation)",
        [],
    )?;
    conn.execute(
        "DELETE FROM sentence WHERE tatoeba_id NOT IN (SELECT source FROM translates)",
        [],
    )?;
    conn.execute(
        "DELETE FROM contains WHERE sentence NOT IN (SELECT id FROM sentence)",
        [],
    )?;
    conn.execute("DELETE FROM word WHERE id NOT IN (SELECT word FROM contains)", [])?;
    Ok(())
}

pub fn recreate_contains_word_index(conn: &Connection) -> Result<(), StorageError> {
    conn.execute("DROP INDEX IF EXISTS idx_contains_word", [])?;
    conn.execute("CREATE INDEX idx_contains_word ON contains(word)", [])?;
    Ok(())
}

pub fn vacuum(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("VACUUM;")?;
    Ok(())
}
