//! `ComputeDifficulty(l1, l2)`: the Difficulty Engine task.
//!
//! Reads L2's tokenized sentences and vocabulary plus the pair's
//! translation-edge file, runs the two-phase scoring algorithm from
//! [`crate::difficulty`], and writes the two intermediate SQLite
//! databases the Course Assembler attaches.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use csv::{ReaderBuilder, WriterBuilder};
use polycloze_scheduler::{Task, TaskId};
use polycloze_storage::{connection, schema};
use rustc_hash::FxHashSet;

use crate::difficulty::{score_sentence, word_table, WordTable};
use crate::pairing::{canonical, l2_is_first_column};
use crate::paths::BuildPaths;
use crate::publish;
use crate::skip_reason::SkipReason;

pub struct ComputeDifficultyTask {
    pub l1: String,
    pub l2: String,
    pub paths: Arc<BuildPaths>,
    pub heap_k: usize,
}

impl Task for ComputeDifficultyTask {
    fn id(&self) -> TaskId {
        TaskId::ComputeDifficulty(self.l1.clone(), self.l2.clone())
    }

    fn inputs(&self) -> Vec<PathBuf> {
        let (lo, hi) = canonical(&self.l1, &self.l2);
        vec![
            self.paths.language_sentences_csv(&self.l2),
            self.paths.language_words_csv(&self.l2),
            self.paths.pair_links_csv(lo, hi),
        ]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![
            self.paths.difficulty_sentences_db(&self.l1, &self.l2),
            self.paths.difficulty_words_db(&self.l1, &self.l2),
        ]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        compute_difficulty(&self.l1, &self.l2, &self.paths, self.heap_k)?;
        Ok(())
    }
}

fn load_word_table(paths: &BuildPaths, l2: &str, heap_k: usize) -> crate::errors::PipelineResult<WordTable> {
    let path = paths.language_words_csv(l2);
    let file = fs::File::open(&path).map_err(|source| crate::errors::PipelineError::Read { path: path.clone(), source })?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| crate::errors::PipelineError::Csv { path: path.clone(), source })?;
        let surface = record.get(0).unwrap_or_default().to_string();
        let frequency_class: i32 = record
            .get(2)
            .unwrap_or("0")
            .parse()
            .map_err(|_| crate::errors::PipelineError::MalformedRow {
                path: path.clone(),
                detail: format!("non-integer frequency_class: {record:?}"),
            })?;
        entries.push((surface, frequency_class));
    }
    Ok(word_table(entries, heap_k))
}

/// Returns the set of L2-side tatoeba ids that appear in the pair's
/// translation-edge file, i.e. the sentences that are actually
/// translated into L1.
fn load_translated_l2_ids(paths: &BuildPaths, l1: &str, l2: &str) -> crate::errors::PipelineResult<FxHashSet<i64>> {
    let (lo, hi) = canonical(l1, l2);
    let path = paths.pair_links_csv(lo, hi);
    let l2_first = l2_is_first_column(l1, l2);

    let file = fs::File::open(&path).map_err(|source| crate::errors::PipelineError::Read { path: path.clone(), source })?;
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(file);

    let mut ids = FxHashSet::default();
    for record in reader.records() {
        let record = record.map_err(|source| crate::errors::PipelineError::Csv { path: path.clone(), source })?;
        let col = if l2_first { 0 } else { 1 };
        let id: i64 = record.get(col).unwrap_or_default().parse().map_err(|_| {
            crate::errors::PipelineError::MalformedRow { path: path.clone(), detail: format!("{record:?}") }
        })?;
        ids.insert(id);
    }
    Ok(ids)
}

pub fn compute_difficulty(
    l1: &str,
    l2: &str,
    paths: &BuildPaths,
    heap_k: usize,
) -> crate::errors::PipelineResult<()> {
    let mut words = load_word_table(paths, l2, heap_k)?;
    let translated = load_translated_l2_ids(paths, l1, l2)?;

    let tmp = tempfile::tempdir().map_err(|source| crate::errors::PipelineError::Write {
        path: paths.difficulty_dir(l1, l2),
        source,
    })?;
    let sentences_db_path = tmp.path().join("sentences.db");
    let skipped_path = tmp.path().join("skipped.csv");

    {
        let conn = connection::open(&sentences_db_path)?;
        schema::create_sentences_db(&conn)?;

        let mut skipped = WriterBuilder::new().from_path(&skipped_path).map_err(|source| {
            crate::errors::PipelineError::Csv { path: skipped_path.clone(), source }
        })?;
        skipped
            .write_record(["tatoeba_id", "text", "reason_for_exclusion"])
            .map_err(|source| crate::errors::PipelineError::Csv { path: skipped_path.clone(), source })?;

        let sentences_path = paths.language_sentences_csv(l2);
        let file = fs::File::open(&sentences_path)
            .map_err(|source| crate::errors::PipelineError::Read { path: sentences_path.clone(), source })?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut insert = conn.prepare(
            "INSERT INTO sentence (text, tatoeba_id, tokens, difficulty) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for record in reader.records() {
            let record = record
                .map_err(|source| crate::errors::PipelineError::Csv { path: sentences_path.clone(), source })?;
            let tatoeba_id: i64 = record.get(0).unwrap_or_default().parse().map_err(|_| {
                crate::errors::PipelineError::MalformedRow {
                    path: sentences_path.clone(),
                    detail: format!("{record:?}"),
                }
            })?;
            let text = record.get(1).unwrap_or_default();
            let tokens_json = record.get(2).unwrap_or_default();

            if !translated.contains(&tatoeba_id) {
                skipped
                    .write_record([&tatoeba_id.to_string(), text, &SkipReason::NotTranslated.to_string()])
                    .map_err(|source| crate::errors::PipelineError::Csv {
                        path: skipped_path.clone(),
                        source,
                    })?;
                continue;
            }

            let tokens: Vec<String> = serde_json::from_str(tokens_json).map_err(|source| {
                crate::errors::PipelineError::TokensJson { path: sentences_path.clone(), source }
            })?;

            match score_sentence(&tokens, &mut words) {
                Some(difficulty) => {
                    insert.execute(rusqlite::params![text, tatoeba_id, tokens_json, difficulty])?;
                }
                None => {
                    skipped
                        .write_record([&tatoeba_id.to_string(), text, &SkipReason::ContainsOovWord.to_string()])
                        .map_err(|source| crate::errors::PipelineError::Csv {
                            path: skipped_path.clone(),
                            source,
                        })?;
                }
            }
        }
        drop(insert);
        skipped.flush().map_err(|source| crate::errors::PipelineError::Write {
            path: skipped_path.clone(),
            source,
        })?;
    }

    let words_db_path = tmp.path().join("words.db");
    {
        let conn = connection::open(&words_db_path)?;
        schema::create_words_db(&conn)?;
        let mut insert = conn.prepare("INSERT INTO word (surface, difficulty) VALUES (?1, ?2)")?;
        for (surface, entry) in &words {
            insert.execute(rusqlite::params![surface, entry.difficulty()])?;
        }
    }

    publish::publish_file(&sentences_db_path, &paths.difficulty_sentences_db(l1, l2))
        .map_err(|source| crate::errors::PipelineError::Write { path: paths.difficulty_sentences_db(l1, l2), source })?;
    publish::publish_file(&words_db_path, &paths.difficulty_words_db(l1, l2))
        .map_err(|source| crate::errors::PipelineError::Write { path: paths.difficulty_words_db(l1, l2), source })?;
    publish::publish_file(&skipped_path, &paths.difficulty_skipped_csv(l1, l2))
        .map_err(|source| crate::errors::PipelineError::Write { path: paths.difficulty_skipped_csv(l1, l2), source })?;

    Ok(())
}
