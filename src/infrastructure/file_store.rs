//! File-backed collaborators
//!
//! Layout below the data directory:
//! - `lists/<list>.tree`: serialized tree of a list
//! - `lists/<selection>.ids`: live task ids of a selection, one per line
//! - `outbound.queue`: one `<rfc3339>\t<list>` line per sync request

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, instrument};

use crate::domain::{ListKey, Selection, TaskId, EMPTY_TREE};
use crate::infrastructure::traits::{FileSystem, SelectionView, TaskSource, TreeStore};

pub const LISTS_DIR: &str = "lists";
pub const TREE_EXTENSION: &str = "tree";
pub const IDS_EXTENSION: &str = "ids";
pub const OUTBOUND_QUEUE: &str = "outbound.queue";

/// Stores each list's serialized tree in its own file.
pub struct FileTreeStore {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl FileTreeStore {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    pub fn tree_path(&self, list: &ListKey) -> PathBuf {
        self.data_dir
            .join(LISTS_DIR)
            .join(format!("{}.{}", list, TREE_EXTENSION))
    }

    pub fn queue_path(&self) -> PathBuf {
        self.data_dir.join(OUTBOUND_QUEUE)
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        if self.fs.exists(dir) {
            Ok(())
        } else {
            self.fs.create_dir_all(dir)
        }
    }
}

impl TreeStore for FileTreeStore {
    #[instrument(level = "debug", skip(self))]
    fn fetch_serialized_tree(&self, list: &ListKey, _selection: &Selection) -> io::Result<String> {
        let path = self.tree_path(list);
        if !self.fs.exists(&path) {
            debug!("no stored tree at {}", path.display());
            return Ok(EMPTY_TREE.to_string());
        }
        self.fs.read_to_string(&path)
    }

    #[instrument(level = "debug", skip(self, serialized))]
    fn persist(&self, list: &ListKey, serialized: &str, request_sync: bool) -> io::Result<()> {
        self.ensure_dir(&self.data_dir.join(LISTS_DIR))?;
        self.fs.write(&self.tree_path(list), serialized)?;
        if request_sync {
            let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            self.fs
                .append_line(&self.queue_path(), &format!("{}\t{}", stamp, list))?;
        }
        Ok(())
    }
}

/// Reads the live ids of a selection from `lists/<selection>.ids`.
///
/// Blank lines and lines starting with `#` are skipped; a missing file means
/// the selection matches nothing.
pub struct FileTaskSource {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl FileTaskSource {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    pub fn ids_path(&self, selection: &Selection) -> PathBuf {
        self.data_dir
            .join(LISTS_DIR)
            .join(format!("{}.{}", selection.name, IDS_EXTENSION))
    }
}

impl TaskSource for FileTaskSource {
    #[instrument(level = "debug", skip(self))]
    fn fetch_matching_ids(&self, selection: &Selection) -> io::Result<Vec<TaskId>> {
        ListKey::new(selection.name.as_str())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        let path = self.ids_path(selection);
        if !self.fs.exists(&path) {
            debug!("no id file at {}", path.display());
            return Ok(Vec::new());
        }
        let content = self.fs.read_to_string(&path)?;
        parse_id_lines(&content).map_err(|(line_no, line)| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}:{}: not a task id: {:?}", path.display(), line_no, line),
            )
        })
    }
}

fn parse_id_lines(content: &str) -> Result<Vec<TaskId>, (usize, String)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            line.parse::<TaskId>()
                .map_err(|_| (line_no, line.to_string()))
        })
        .collect()
}

/// View that only records refresh signals in the log.
#[derive(Debug, Default)]
pub struct LoggingView;

impl SelectionView for LoggingView {
    fn refresh(&self, selection: &Selection) {
        info!("refresh requested for selection {}", selection);
    }
}
