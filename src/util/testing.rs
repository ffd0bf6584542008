//! Test support: logging setup and in-memory collaborators

use std::collections::HashMap;
use std::env;
use std::io;
use std::sync::{Arc, Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::Collaborators;
use crate::domain::{ListKey, Selection, TaskId, EMPTY_TREE};
use crate::infrastructure::traits::{SelectionView, TaskSource, TreeStore};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = [""];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| !name.is_empty() && metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// One call to [`TreeStore::persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistCall {
    pub list: ListKey,
    pub serialized: String,
    pub request_sync: bool,
}

/// Tree store keeping trees in memory and recording every persist call.
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    trees: Mutex<HashMap<ListKey, String>>,
    calls: Mutex<Vec<PersistCall>>,
    fail_persist: Mutex<bool>,
}

impl MemoryTreeStore {
    pub fn with_tree(list: &ListKey, serialized: &str) -> Self {
        let store = Self::default();
        store.set_tree(list, serialized);
        store
    }

    pub fn set_tree(&self, list: &ListKey, serialized: &str) {
        self.trees
            .lock()
            .unwrap()
            .insert(list.clone(), serialized.to_string());
    }

    pub fn tree(&self, list: &ListKey) -> Option<String> {
        self.trees.lock().unwrap().get(list).cloned()
    }

    pub fn calls(&self) -> Vec<PersistCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_persist(&self, fail: bool) {
        *self.fail_persist.lock().unwrap() = fail;
    }
}

impl TreeStore for MemoryTreeStore {
    fn fetch_serialized_tree(&self, list: &ListKey, _selection: &Selection) -> io::Result<String> {
        Ok(self.tree(list).unwrap_or_else(|| EMPTY_TREE.to_string()))
    }

    fn persist(&self, list: &ListKey, serialized: &str, request_sync: bool) -> io::Result<()> {
        if *self.fail_persist.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::Other, "store offline"));
        }
        self.set_tree(list, serialized);
        self.calls.lock().unwrap().push(PersistCall {
            list: list.clone(),
            serialized: serialized.to_string(),
            request_sync,
        });
        Ok(())
    }
}

/// Task source returning a fixed id list, or failing on demand.
#[derive(Debug, Default)]
pub struct StaticTaskSource {
    ids: Mutex<Vec<TaskId>>,
    fail: Mutex<bool>,
}

impl StaticTaskSource {
    pub fn new(ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
            fail: Mutex::new(false),
        }
    }

    pub fn set_ids(&self, ids: impl IntoIterator<Item = TaskId>) {
        *self.ids.lock().unwrap() = ids.into_iter().collect();
    }

    pub fn fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl TaskSource for StaticTaskSource {
    fn fetch_matching_ids(&self, _selection: &Selection) -> io::Result<Vec<TaskId>> {
        if *self.fail.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::Other, "query failed"));
        }
        Ok(self.ids.lock().unwrap().clone())
    }
}

/// View counting refresh signals.
#[derive(Debug, Default)]
pub struct RecordingView {
    refreshed: Mutex<Vec<Selection>>,
}

impl RecordingView {
    pub fn refresh_count(&self) -> usize {
        self.refreshed.lock().unwrap().len()
    }
}

impl SelectionView for RecordingView {
    fn refresh(&self, selection: &Selection) {
        self.refreshed.lock().unwrap().push(selection.clone());
    }
}

/// In-memory collaborator set with handles kept for assertions.
pub struct TestCollaborators {
    pub store: Arc<MemoryTreeStore>,
    pub tasks: Arc<StaticTaskSource>,
    pub view: Arc<RecordingView>,
}

impl TestCollaborators {
    pub fn new(list: &ListKey, serialized: &str, live_ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            store: Arc::new(MemoryTreeStore::with_tree(list, serialized)),
            tasks: Arc::new(StaticTaskSource::new(live_ids)),
            view: Arc::new(RecordingView::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(self.store.clone(), self.tasks.clone(), self.view.clone())
    }
}
