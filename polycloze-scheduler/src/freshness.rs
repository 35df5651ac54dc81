//! Mtime-based staleness check.
//!
//! A file's mtime is its own. A directory's mtime aggregates over its
//! own mtime and all of its children, recursively: the aggregate is a
//! max when the path is being read as a source (the newest change
//! anywhere under it should trigger a rebuild) and a min when the path
//! is being read as a target (the oldest file under it bounds how
//! fresh the whole directory claims to be).
//!
//! A missing input path is a fatal error. A missing output path is
//! treated as infinitely old, i.e. always stale.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::SchedulerError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Source,
    Target,
}

fn io_err(path: &Path, source: std::io::Error) -> SchedulerError {
    SchedulerError::Io { path: path.to_path_buf(), source }
}

fn aggregate(path: &Path, role: Role) -> Result<Option<SystemTime>, SchedulerError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path, e)),
    };

    let own = metadata.modified().map_err(|e| io_err(path, e))?;
    if !metadata.is_dir() {
        return Ok(Some(own));
    }

    let mut acc = own;
    for entry in fs::read_dir(path).map_err(|e| io_err(path, e))? {
        let entry = entry.map_err(|e| io_err(path, e))?;
        if let Some(child) = aggregate(&entry.path(), role)? {
            acc = match role {
                Role::Source => acc.max(child),
                Role::Target => acc.min(child),
            };
        }
    }
    Ok(Some(acc))
}

/// Decides whether a task whose declared `inputs` and `outputs` are
/// given must run. `force_rebuild` short-circuits to `true` without
/// touching the filesystem.
pub fn is_outdated(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    force_rebuild: bool,
) -> Result<bool, SchedulerError> {
    if force_rebuild {
        return Ok(true);
    }

    let mut min_target: Option<SystemTime> = None;
    for output in outputs {
        match aggregate(output, Role::Target)? {
            Some(t) => min_target = Some(min_target.map_or(t, |m| m.min(t))),
            None => return Ok(true),
        }
    }

    let mut max_source: Option<SystemTime> = None;
    for input in inputs {
        match aggregate(input, Role::Source)? {
            Some(t) => max_source = Some(max_source.map_or(t, |m| m.max(t))),
            None => return Err(SchedulerError::MissingInput { path: input.clone() }),
        }
    }

    match (max_source, min_target) {
        (Some(src), Some(tgt)) => Ok(src > tgt),
        (None, _) => Ok(false),
        (Some(_), None) => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;
    use std::thread::sleep;
    use std::time::Duration;

    fn touch(path: &Path, contents: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn missing_output_is_outdated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        touch(&input, "a");
        let output = dir.path().join("out.txt");

        assert!(is_outdated(&[input], &[output], false).unwrap());
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.txt");
        let output = dir.path().join("out.txt");
        touch(&output, "a");

        let err = is_outdated(&[input], &[output], false).unwrap_err();
        assert!(matches!(err, SchedulerError::MissingInput { .. }));
    }

    #[test]
    fn newer_input_makes_output_stale() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        touch(&output, "a");
        sleep(Duration::from_millis(10));
        touch(&input, "b");

        assert!(is_outdated(&[input], &[output], false).unwrap());
    }

    #[test]
    fn older_input_leaves_output_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        touch(&input, "a");
        sleep(Duration::from_millis(10));
        let output = dir.path().join("out.txt");
        touch(&output, "b");

        assert!(!is_outdated(&[input], &[output], false).unwrap());
    }

    #[test]
    fn force_rebuild_always_outdated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        touch(&input, "a");
        let output = dir.path().join("out.txt");
        touch(&output, "b");

        assert!(is_outdated(&[input], &[output], true).unwrap());
    }

    #[test]
    fn directory_aggregation_picks_newest_source_and_oldest_target() {
        let dir = tempfile::tempdir().unwrap();
        let src_dir = dir.path().join("src");
        fs::create_dir(&src_dir).unwrap();
        touch(&src_dir.join("a.txt"), "a");

        let tgt_dir = dir.path().join("tgt");
        fs::create_dir(&tgt_dir).unwrap();
        sleep(Duration::from_millis(10));
        touch(&tgt_dir.join("b.txt"), "b");

        assert!(!is_outdated(&[src_dir.clone()], &[tgt_dir.clone()], false).unwrap());

        sleep(Duration::from_millis(10));
        touch(&src_dir.join("c.txt"), "c");
        assert!(is_outdated(&[src_dir], &[tgt_dir], false).unwrap());
    }
}
