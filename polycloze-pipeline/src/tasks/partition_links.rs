//! `PartitionLinks`: Phase A of the Course Assembler. Splits the
//! global Tatoeba links TSV into one CSV file per language pair, so
//! later tasks never have to scan links for languages they don't
//! need.
//!
//! Grounded on `examples/original_source/python/scripts/link.py`:
//! `sentence_languages` builds the id -> language map, `LinkFiles`
//! bounds the number of simultaneously open per-pair files, and a
//! link is written under `{lo}-{hi}.csv` only when its source sentence
//! already belongs to the lexicographically smaller language -
//! Tatoeba's link export lists both directions of a mutual
//! translation, so keeping only the ascending direction is how the
//! original avoids writing every pair twice.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use polycloze_scheduler::{Task, TaskId};

use crate::errors::{PipelineError, PipelineResult};
use crate::lru::FileHandleCache;
use crate::pairing::canonical;
use crate::paths::BuildPaths;
use crate::publish;

pub struct PartitionLinksTask {
    pub paths: Arc<BuildPaths>,
    pub lru_cap: usize,
}

impl Task for PartitionLinksTask {
    fn id(&self) -> TaskId {
        TaskId::PartitionLinks
    }

    fn inputs(&self) -> Vec<PathBuf> {
        vec![self.paths.raw_links_csv(), self.paths.raw_sentences_csv()]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.paths.links_dir()]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        partition_links(&self.paths, self.lru_cap)?;
        Ok(())
    }
}

/// Builds the sentence id -> language code map from
/// `build/tatoeba/sentences.csv`. Kept in memory for the duration of
/// the links scan, same tradeoff the original makes.
fn sentence_languages(paths: &BuildPaths) -> PipelineResult<HashMap<i64, String>> {
    let path = paths.raw_sentences_csv();
    let file = fs::File::open(&path).map_err(|source| PipelineError::Read { path: path.clone(), source })?;
    let reader = BufReader::new(file);

    let mut map = HashMap::new();
    for line in reader.lines() {
        let line = line.map_err(|source| PipelineError::Read { path: path.clone(), source })?;
        let mut parts = line.splitn(3, '\t');
        let (id, language) = match (parts.next(), parts.next()) {
            (Some(id), Some(language)) => (id, language),
            _ => {
                return Err(PipelineError::MalformedRow {
                    path: path.clone(),
                    detail: format!("expected id\\tlanguage\\ttext, got {line:?}"),
                })
            }
        };
        let id: i64 = id.parse().map_err(|_| PipelineError::MalformedRow {
            path: path.clone(),
            detail: format!("non-integer sentence id: {id:?}"),
        })?;
        map.insert(id, language.to_string());
    }
    Ok(map)
}

pub fn partition_links(paths: &BuildPaths, lru_cap: usize) -> PipelineResult<()> {
    let language = sentence_languages(paths)?;

    let source = paths.raw_links_csv();
    let file = fs::File::open(&source).map_err(|e| PipelineError::Read { path: source.clone(), source: e })?;
    let reader = BufReader::new(file);

    let tmp = tempfile::tempdir().map_err(|e| PipelineError::Write { path: source.clone(), source: e })?;
    let mut cache = FileHandleCache::new(tmp.path(), lru_cap);

    for line in reader.lines() {
        let line = line.map_err(|e| PipelineError::Read { path: source.clone(), source: e })?;
        let mut parts = line.splitn(2, '\t');
        let (source_id, target_id) = match (parts.next(), parts.next()) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let Ok(source_id) = source_id.parse::<i64>() else { continue };
        let Ok(target_id) = target_id.trim().parse::<i64>() else { continue };

        let (Some(source_lang), Some(target_lang)) = (language.get(&source_id), language.get(&target_id)) else {
            // Some tatoeba links refer to deleted sentences.
            continue;
        };
        if source_lang >= target_lang {
            continue;
        }

        let (lo, hi) = canonical(source_lang, target_lang);
        cache
            .write_line(lo, hi, &format!("{source_id},{target_id}"))
            .map_err(|e| PipelineError::Write { path: cache.dir().join(format!("{lo}-{hi}.csv")), source: e })?;
    }
    cache.close_all();

    publish::publish_dir_merge(tmp.path(), &paths.links_dir())
        .map_err(|e| PipelineError::Write { path: paths.links_dir(), source: e })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_ascending_direction_of_cross_language_links() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.tatoeba_dir()).unwrap();
        fs::write(paths.raw_sentences_csv(), "1\teng\tHi.\n2\tspa\tHola.\n").unwrap();
        fs::write(paths.raw_links_csv(), "1\t2\n2\t1\n").unwrap();

        partition_links(&paths, 100).unwrap();

        let contents = fs::read_to_string(paths.pair_links_csv("eng", "spa")).unwrap();
        assert_eq!(contents, "1,2\n");
    }

    #[test]
    fn drops_links_between_sentences_of_the_same_language() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.tatoeba_dir()).unwrap();
        fs::write(paths.raw_sentences_csv(), "1\teng\tHi.\n2\teng\tHello.\n").unwrap();
        fs::write(paths.raw_links_csv(), "1\t2\n").unwrap();

        partition_links(&paths, 100).unwrap();

        assert!(!paths.links_dir().join("eng-eng.csv").exists());
    }

    #[test]
    fn drops_links_to_deleted_sentences() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.tatoeba_dir()).unwrap();
        fs::write(paths.raw_sentences_csv(), "1\teng\tHi.\n").unwrap();
        fs::write(paths.raw_links_csv(), "1\t999\n").unwrap();

        partition_links(&paths, 100).unwrap();

        assert!(fs::read_dir(paths.links_dir()).map(|mut d| d.next().is_none()).unwrap_or(true));
    }
}
