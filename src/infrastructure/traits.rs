//! I/O boundary traits for testability
//!
//! These traits abstract the collaborators of the ordered-list core (tree
//! storage, task enumeration, view refresh) and the filesystem underneath the
//! file-backed implementations, allowing services to be tested with in-memory
//! doubles.

use std::io::{self, Write};
use std::path::Path;

use crate::domain::{ListKey, Selection, TaskId};

/// Storage for serialized trees, keyed by list.
pub trait TreeStore: Send + Sync {
    /// Fetch the serialized tree stored for a list.
    fn fetch_serialized_tree(&self, list: &ListKey, selection: &Selection) -> io::Result<String>;

    /// Persist a serialized tree. `request_sync` marks a user edit that
    /// should be propagated by outbound synchronization.
    fn persist(&self, list: &ListKey, serialized: &str, request_sync: bool) -> io::Result<()>;
}

/// Source of the task ids currently matching a selection.
pub trait TaskSource: Send + Sync {
    /// Enumerate all matching ids. The result is fully materialized.
    fn fetch_matching_ids(&self, selection: &Selection) -> io::Result<Vec<TaskId>>;
}

/// View showing the tasks of a selection.
pub trait SelectionView: Send + Sync {
    /// Signal that the ordering changed and the view should reload.
    fn refresh(&self, selection: &Selection);
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace file content atomically (temp file + rename).
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Append a line to a file, creating it if needed.
    fn append_line(&self, path: &Path, line: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn append_line(&self, path: &Path, line: &str) -> io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", line)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
