//! The Course Assembler: Phases B (populate) and C (shrink) of course
//! database construction. Phase A (link partitioning) is a separate,
//! shared task — see [`crate::tasks::partition_links`].
//!
//! Grounded on `examples/original_source/python/scripts/populate.py`
//! (population order: language, translates, sentences, words,
//! translations, contains) and `shrink.py` (prune order: contains,
//! word, translates, translation). The original's per-insert temp
//! trigger that bumps a sentence's `frequency_class` as words are
//! attached to it is unnecessary here: sentences arrive from the
//! Difficulty Engine already carrying their final difficulty, so
//! Phase C only needs to bump *words* up to the sentences that
//! contain them, not the other way around.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use polycloze_core::registry;
use polycloze_core::types::canonicalize;
use polycloze_storage::{connection, queries, BatchCommand, BatchWriter, COURSE_SCHEMA_SQL};
use rusqlite::Connection;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::{PipelineError, PipelineResult};
use crate::pairing::{canonical, l2_is_first_column};
use crate::paths::BuildPaths;
use crate::publish;

pub fn assemble_course(l1: &str, l2: &str, paths: &BuildPaths, max_examples: usize) -> PipelineResult<()> {
    let tmp = tempfile::tempdir().map_err(|source| PipelineError::Write { path: paths.course_db(l1, l2), source })?;
    let scratch_path = tmp.path().join("course.db");

    let mut conn = connection::open(&scratch_path)?;
    conn.execute_batch(COURSE_SCHEMA_SQL)?;

    let writer = BatchWriter::new(connection::open(&scratch_path)?);
    populate(&mut conn, &writer, l1, l2, paths, max_examples)?;
    let stats = writer.shutdown()?;
    debug!(
        translates_rows = stats.translates_rows,
        contains_rows = stats.contains_rows,
        flushes = stats.flushes,
        "batch writer drained before shrink"
    );

    shrink(&conn)?;

    publish::publish_file(&scratch_path, &paths.course_db(l1, l2))
        .map_err(|source| PipelineError::Write { path: paths.course_db(l1, l2), source })?;
    Ok(())
}

fn language_row(code: &str) -> PipelineResult<(String, String)> {
    let language = registry::find(code)
        .ok_or_else(|| polycloze_core::CoreError::UnknownLanguage { code: code.to_string() })?;
    Ok((language.name.to_string(), language.bcp47.to_string()))
}

fn populate(
    conn: &mut Connection,
    writer: &BatchWriter,
    l1: &str,
    l2: &str,
    paths: &BuildPaths,
    max_examples: usize,
) -> PipelineResult<()> {
    let (l1_name, l1_bcp47) = language_row(l1)?;
    let (l2_name, l2_bcp47) = language_row(l2)?;
    queries::insert_language(conn, 1, l1, &l1_name, &l1_bcp47)?;
    queries::insert_language(conn, 2, l2, &l2_name, &l2_bcp47)?;

    let (lo, hi) = canonical(l1, l2);
    let translates = load_translates(&paths.pair_links_csv(lo, hi), l1_is_source(l1, l2))?;
    writer.send(BatchCommand::InsertTranslates(translates))?;
    writer.flush_sync()?;

    queries::copy_sentences_from(conn, &paths.difficulty_sentences_db(l1, l2))?;
    queries::copy_words_from(conn, &paths.difficulty_words_db(l1, l2))?;

    let l1_sentences = load_sentence_texts(&paths.language_sentences_csv(l1))?;
    queries::insert_reachable_translations(conn, &l1_sentences)?;

    build_contains(conn, writer, max_examples)?;
    writer.flush_sync()?;
    Ok(())
}

fn shrink(conn: &Connection) -> PipelineResult<()> {
    queries::bump_frequency_classes(conn)?;
    queries::recap_contains(conn)?;
    queries::prune_orphans(conn)?;
    queries::recreate_contains_word_index(conn)?;
    queries::vacuum(conn)?;
    Ok(())
}

/// Whether L1's tatoeba ids are the first column of the pair's
/// canonical links file.
fn l1_is_source(l1: &str, l2: &str) -> bool {
    !l2_is_first_column(l1, l2)
}

/// Reads the pair's canonical links file and orients each row as
/// `(source, target)` with `source` on the L2 side, per
/// [`queries::insert_translates`]'s contract.
fn load_translates(path: &Path, l1_is_first_column: bool) -> PipelineResult<Vec<(i64, i64)>> {
    let file = fs::File::open(path).map_err(|source| PipelineError::Read { path: path.to_path_buf(), source })?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| PipelineError::Read { path: path.to_path_buf(), source })?;
        let Some((a, b)) = line.split_once(',') else {
            return Err(PipelineError::MalformedRow { path: path.to_path_buf(), detail: line });
        };
        let parse = |s: &str| -> PipelineResult<i64> {
            s.trim().parse().map_err(|_| PipelineError::MalformedRow {
                path: path.to_path_buf(),
                detail: format!("non-integer id: {s:?}"),
            })
        };
        let (a, b) = (parse(a)?, parse(b)?);
        let (source, target) = if l1_is_first_column { (b, a) } else { (a, b) };
        rows.push((source, target));
    }
    Ok(rows)
}

fn load_sentence_texts(path: &Path) -> PipelineResult<HashMap<i64, String>> {
    let file = fs::File::open(path).map_err(|source| PipelineError::Read { path: path.to_path_buf(), source })?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut out = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|source| PipelineError::Csv { path: path.to_path_buf(), source })?;
        let id: i64 = record.get(0).unwrap_or_default().parse().map_err(|_| PipelineError::MalformedRow {
            path: path.to_path_buf(),
            detail: format!("{record:?}"),
        })?;
        out.insert(id, record.get(1).unwrap_or_default().to_string());
    }
    Ok(out)
}

/// Builds `contains` edges, capping each word at `max_examples`
/// sentences. Sentences are visited from easiest to hardest so the
/// retained examples are always a word's easiest ones.
fn build_contains(conn: &Connection, writer: &BatchWriter, max_examples: usize) -> PipelineResult<()> {
    let mut stmt = conn.prepare("SELECT id, tokens FROM sentence ORDER BY frequency_class ASC, id ASC")?;
    let sentences: Vec<(i64, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<_, _>>()?;
    drop(stmt);

    let mut counts: FxHashMap<i64, usize> = FxHashMap::default();
    let mut edges: Vec<(i64, i64)> = Vec::new();

    for (sentence_id, tokens_json) in &sentences {
        let tokens: Vec<String> = serde_json::from_str(tokens_json)
            .map_err(|source| PipelineError::TokensJson {
                path: Path::new(&format!("sentence:{sentence_id}")).to_path_buf(),
                source,
            })?;
        let surfaces: Vec<String> = tokens.iter().map(|t| canonicalize(t)).filter(|t| !t.is_empty()).collect();
        let word_ids = queries::lookup_word_ids(conn, &surfaces)?;

        let mut seen = std::collections::HashSet::new();
        for surface in &surfaces {
            let Some(&word_id) = word_ids.get(surface) else { continue };
            if !seen.insert(word_id) {
                continue;
            }
            let count = counts.entry(word_id).or_insert(0);
            if *count >= max_examples {
                continue;
            }
            *count += 1;
            edges.push((*sentence_id, word_id));
        }
    }

    writer.send(BatchCommand::InsertContains(edges))?;
    Ok(())
}
