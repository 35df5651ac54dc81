//! `DecompressSentences` / `DecompressLinks`: unpack the Tatoeba
//! `tar.bz2` archives into the raw `sentences.csv` / `links.csv` TSVs
//! every other task reads from.
//!
//! Grounded on `examples/original_source/python/scripts/untar.py`:
//! extract into a scratch directory first, then publish, so a reader
//! never observes a half-extracted archive; the original also bumps
//! mtimes after extraction since tar preserves the original archive's
//! timestamps, which the freshness check would otherwise read as
//! already-stale.

use std::path::PathBuf;
use std::sync::Arc;

use polycloze_core::collab::ArchiveSource;
use polycloze_scheduler::{Task, TaskId};

use crate::errors::PipelineResult;
use crate::paths::BuildPaths;
use crate::publish;

pub struct DecompressSentencesTask {
    pub paths: Arc<BuildPaths>,
    pub archive_source: Arc<dyn ArchiveSource + Send + Sync>,
}

impl Task for DecompressSentencesTask {
    fn id(&self) -> TaskId {
        TaskId::DecompressSentences
    }

    fn inputs(&self) -> Vec<PathBuf> {
        vec![self.paths.sentences_archive()]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.paths.raw_sentences_csv()]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        decompress(&self.paths, self.archive_source.as_ref(), &self.paths.sentences_archive())?;
        Ok(())
    }
}

pub struct DecompressLinksTask {
    pub paths: Arc<BuildPaths>,
    pub archive_source: Arc<dyn ArchiveSource + Send + Sync>,
}

impl Task for DecompressLinksTask {
    fn id(&self) -> TaskId {
        TaskId::DecompressLinks
    }

    fn inputs(&self) -> Vec<PathBuf> {
        vec![self.paths.links_archive()]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.paths.raw_links_csv()]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        decompress(&self.paths, self.archive_source.as_ref(), &self.paths.links_archive())?;
        Ok(())
    }
}

fn decompress(
    paths: &BuildPaths,
    archive_source: &(dyn ArchiveSource + Send + Sync),
    archive: &std::path::Path,
) -> PipelineResult<()> {
    let tmp = tempfile::tempdir().map_err(|source| crate::errors::PipelineError::Write {
        path: paths.tatoeba_dir(),
        source,
    })?;
    archive_source.decompress(archive, tmp.path())?;
    touch_extracted_files(tmp.path())
        .map_err(|source| crate::errors::PipelineError::Write { path: paths.tatoeba_dir(), source })?;
    publish::publish_dir_merge(tmp.path(), &paths.tatoeba_dir())
        .map_err(|source| crate::errors::PipelineError::Write { path: paths.tatoeba_dir(), source })?;
    Ok(())
}

/// Bumps each extracted file's mtime to now. `tar` preserves the
/// archive-embedded timestamps, which are older than the archive's own
/// download mtime; left alone, the freshness check would see these
/// outputs as already stale relative to their own input on every run.
fn touch_extracted_files(dir: &std::path::Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::File::open(entry.path())?.set_modified(std::time::SystemTime::now())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polycloze_core::errors::ArchiveError;
    use std::fs;
    use std::path::Path;

    struct StubArchiveSource {
        filename: &'static str,
        contents: &'static str,
    }

    impl ArchiveSource for StubArchiveSource {
        fn decompress(&self, archive: &Path, destination: &Path) -> Result<(), ArchiveError> {
            if !archive.is_file() {
                return Err(ArchiveError::NotFound { path: archive.to_path_buf() });
            }
            fs::write(destination.join(self.filename), self.contents).unwrap();
            Ok(())
        }
    }

    #[test]
    fn publishes_extracted_csv_into_the_tatoeba_directory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.tatoeba_dir()).unwrap();
        fs::write(paths.sentences_archive(), b"fake archive").unwrap();

        let source = StubArchiveSource { filename: "sentences.csv", contents: "1\teng\tHi.\n" };
        decompress(&paths, &source, &paths.sentences_archive()).unwrap();

        assert_eq!(fs::read_to_string(paths.raw_sentences_csv()).unwrap(), "1\teng\tHi.\n");
    }

    #[test]
    fn touch_extracted_files_bumps_stale_mtime_to_now() {
        use std::time::{Duration, SystemTime};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentences.csv");
        fs::write(&path, "1\teng\tHi.\n").unwrap();

        let stale = SystemTime::now() - Duration::from_secs(3600);
        fs::File::open(&path).unwrap().set_modified(stale).unwrap();

        touch_extracted_files(dir.path()).unwrap();

        let mtime = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(mtime > stale);
    }

    #[test]
    fn propagates_missing_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        let source = StubArchiveSource { filename: "sentences.csv", contents: "" };
        let err = decompress(&paths, &source, &paths.sentences_archive());
        assert!(err.is_err());
    }
}
