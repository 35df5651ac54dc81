//! Atomic publish of a task's output: build in a temp location, then
//! move into place so a concurrent reader never observes a
//! half-written file or directory.
//!
//! A plain `rename` is preferred (atomic, same filesystem); when the
//! temp directory and the destination are on different devices,
//! `rename` fails with `EXDEV` and we fall back to copy-then-remove,
//! which is not atomic but is the best available guarantee without
//! control over where `TMPDIR` lives.

use std::fs;
use std::io;
use std::path::Path;

/// Moves `from` to `to`, creating `to`'s parent directory if needed.
/// `from` is a file.
pub fn publish_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

/// Moves every entry of directory `from` into directory `to`,
/// creating `to` if needed, merging with any existing contents
/// (later writers of the same filename win).
pub fn publish_dir_merge(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let dest = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            publish_dir_merge(&entry.path(), &dest)?;
        } else {
            publish_file(&entry.path(), &dest)?;
        }
    }
    fs::remove_dir_all(from).or_else(|e| if e.kind() == io::ErrorKind::NotFound { Ok(()) } else { Err(e) })
}

fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc_exdev())
}

/// `EXDEV` is 18 on Linux and every other platform this workspace
/// targets; avoids pulling in a `libc` dependency for one constant.
const fn libc_exdev() -> i32 {
    18
}
