//! Bounded cache of open append-mode file handles for the link
//! partitioner.
//!
//! Per the design notes: true LRU is not required, queue-ordered
//! eviction (oldest *inserted*, not oldest *used*) is acceptable. This
//! keeps the cache a plain `VecDeque` + map instead of needing an
//! intrusive linked list.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Maps a pair key to an open, append-mode file handle, evicting the
/// oldest-inserted entry once `capacity` is exceeded. An evicted
/// handle is simply closed (dropped); the next write for that key
/// reopens it in append mode, so no data is lost.
pub struct FileHandleCache {
    dir: PathBuf,
    capacity: usize,
    order: VecDeque<(String, String)>,
    open: FxHashMap<(String, String), File>,
}

impl FileHandleCache {
    pub fn new(dir: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            dir: dir.into(),
            capacity: capacity.max(1),
            order: VecDeque::new(),
            open: FxHashMap::default(),
        }
    }

    pub fn write_line(&mut self, lo: &str, hi: &str, line: &str) -> io::Result<()> {
        let key = (lo.to_string(), hi.to_string());
        if !self.open.contains_key(&key) {
            if self.open.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.open.remove(&oldest);
                }
            }
            let path = self.path_for(lo, hi);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            self.open.insert(key.clone(), file);
            self.order.push_back(key.clone());
        }
        let file = self.open.get_mut(&key).expect("just inserted or already present");
        writeln!(file, "{line}")
    }

    fn path_for(&self, lo: &str, hi: &str) -> PathBuf {
        self.dir.join(format!("{lo}-{hi}.csv"))
    }

    /// Closes every handle, flushing pending writes. Called once the
    /// partitioning stream is exhausted.
    pub fn close_all(&mut self) {
        self.open.clear();
        self.order.clear();
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
