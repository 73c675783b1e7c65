//! Polling directory watcher
//!
//! Rescans one directory (not recursively) and reports regular files that
//! were not there on the previous scan. Files present when the watcher is
//! created count as already seen. A file that disappears and comes back is
//! reported again.

use crate::error::DaemonError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A newly created file, ready to be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Full path of the new file
    pub path: PathBuf,
}

impl FileEvent {
    /// Basename of the file
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Whether `path` names a text note (`.txt`, any case)
pub fn is_text_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase().ends_with(".txt"))
        .unwrap_or(false)
}

/// Reports new `.txt` files in a single directory
#[derive(Debug)]
pub struct DirectoryWatcher {
    dir: PathBuf,
    seen: HashSet<PathBuf>,
}

impl DirectoryWatcher {
    /// Start watching `dir`
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::Watch`] if `dir` is not a readable directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DaemonError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DaemonError::Watch(format!("{} is not a directory", dir.display())));
        }

        let mut watcher = Self {
            dir,
            seen: HashSet::new(),
        };
        watcher.seen = watcher.list()?;
        Ok(watcher)
    }

    /// The watched directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn list(&self) -> Result<HashSet<PathBuf>, DaemonError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| DaemonError::Watch(format!("Cannot list {}: {}", self.dir.display(), e)))?;

        Ok(entries.filter_map(|entry| entry.ok()).map(|entry| entry.path()).collect())
    }

    /// Rescan and return new `.txt` files, oldest modification first
    ///
    /// Directories and other file types are marked seen but never reported.
    pub fn poll(&mut self) -> Result<Vec<FileEvent>, DaemonError> {
        let mut current = self.list()?;

        let mut created: Vec<(SystemTime, PathBuf)> = Vec::new();
        let mut unreadable: Vec<PathBuf> = Vec::new();

        for path in current.iter().filter(|path| !self.seen.contains(*path)) {
            if !is_text_file(path) {
                continue;
            }
            match fs::metadata(path) {
                Ok(metadata) if metadata.is_file() => {
                    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                    created.push((modified, path.clone()));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Cannot stat {} yet: {}", path.display(), e);
                    unreadable.push(path.clone());
                }
            }
        }

        // Retried on the next scan
        for path in &unreadable {
            current.remove(path);
        }

        created.sort();
        self.seen = current;

        Ok(created.into_iter().map(|(_, path)| FileEvent { path }).collect())
    }
}
