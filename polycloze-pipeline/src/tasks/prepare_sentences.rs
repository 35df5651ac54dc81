//! `PrepareSentences`: splits the full Tatoeba sentence TSV into one
//! `build/sentences/{code}.tsv` file per language, so later tasks can
//! tokenize languages independently and in parallel.
//!
//! Grounded on `examples/original_source/python/scripts/partition.py`:
//! the original sorts by language first so lines for the same language
//! land contiguously before a single pass splits them into per-language
//! files. A streaming pass keyed by language in a hash map gets the
//! same result without an external `sort` and is the natural choice
//! once we're not shelling out to `sort -k2,2`.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use polycloze_scheduler::{Task, TaskId};

use crate::errors::{PipelineError, PipelineResult};
use crate::paths::BuildPaths;
use crate::publish;

pub struct PrepareSentencesTask {
    pub paths: Arc<BuildPaths>,
}

impl Task for PrepareSentencesTask {
    fn id(&self) -> TaskId {
        TaskId::PrepareSentences
    }

    fn inputs(&self) -> Vec<PathBuf> {
        vec![self.paths.raw_sentences_csv()]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.paths.partitioned_sentences_dir()]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        prepare_sentences(&self.paths)?;
        Ok(())
    }
}

pub fn prepare_sentences(paths: &BuildPaths) -> PipelineResult<()> {
    let source = paths.raw_sentences_csv();
    let file = fs::File::open(&source).map_err(|e| PipelineError::Read { path: source.clone(), source: e })?;
    let reader = BufReader::new(file);

    let tmp = tempfile::tempdir().map_err(|e| PipelineError::Write { path: source.clone(), source: e })?;
    let mut writers: BTreeMap<String, BufWriter<fs::File>> = BTreeMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PipelineError::Read { path: source.clone(), source: e })?;
        let mut parts = line.splitn(3, '\t');
        let (id, language, text) = match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(language), Some(text)) => (id, language, text),
            _ => {
                return Err(PipelineError::MalformedRow {
                    path: source.clone(),
                    detail: format!("line {line_no}: expected id\\tlanguage\\ttext"),
                })
            }
        };

        let writer = match writers.get_mut(language) {
            Some(w) => w,
            None => {
                let path = tmp.path().join(format!("{language}.tsv"));
                let file = fs::File::create(&path).map_err(|e| PipelineError::Write { path, source: e })?;
                writers.entry(language.to_string()).or_insert_with(|| BufWriter::new(file))
            }
        };
        writeln!(writer, "{id}\t{text}").map_err(|e| PipelineError::Write {
            path: tmp.path().join(format!("{language}.tsv")),
            source: e,
        })?;
    }

    for writer in writers.values_mut() {
        writer.flush().map_err(|e| PipelineError::Write { path: tmp.path().to_path_buf(), source: e })?;
    }
    drop(writers);

    publish::publish_dir_merge(tmp.path(), &paths.partitioned_sentences_dir()).map_err(|e| {
        PipelineError::Write { path: paths.partitioned_sentences_dir(), source: e }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_global_tsv_by_language() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.tatoeba_dir()).unwrap();
        fs::write(
            paths.raw_sentences_csv(),
            "1\teng\tThe cat sat.\n2\tspa\tEl gato se sento.\n3\teng\tHello.\n",
        )
        .unwrap();

        prepare_sentences(&paths).unwrap();

        let eng = fs::read_to_string(paths.partitioned_sentences("eng")).unwrap();
        assert_eq!(eng, "1\tThe cat sat.\n3\tHello.\n");
        let spa = fs::read_to_string(paths.partitioned_sentences("spa")).unwrap();
        assert_eq!(spa, "2\tEl gato se sento.\n");
    }

    #[test]
    fn rejects_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.tatoeba_dir()).unwrap();
        fs::write(paths.raw_sentences_csv(), "not-enough-columns\n").unwrap();

        assert!(prepare_sentences(&paths).is_err());
    }
}
