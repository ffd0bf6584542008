//! Service container for dependency injection
//!
//! Wires settings and collaborators into ordered list updaters.

use std::sync::Arc;

use tracing::instrument;

use crate::application::{ApplicationResult, Collaborators, OrderedListUpdater};
use crate::config::Settings;
use crate::domain::{ListKey, Selection};
use crate::infrastructure::file_store::{FileTaskSource, FileTreeStore, LoggingView};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding settings and the collaborators every list is opened with.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Tree store, task source and view
    pub collaborators: Collaborators,
}

impl ServiceContainer {
    /// Create a new service container with file-backed implementations
    /// rooted at `settings.base_dir`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let lists_dir = settings.lists_dir();
        fs.create_dir_all(&lists_dir)
            .map_err(|e| InfraError::io(format!("create {}", lists_dir.display()), e))?;

        let collaborators = Collaborators::new(
            Arc::new(FileTreeStore::new(fs.clone(), &settings.base_dir)),
            Arc::new(FileTaskSource::new(fs, &settings.base_dir)),
            Arc::new(LoggingView),
        );
        Ok(Self::with_deps(settings, collaborators))
    }

    /// Create a service container with custom collaborators (for testing).
    pub fn with_deps(settings: Settings, collaborators: Collaborators) -> Self {
        Self {
            settings: Arc::new(settings),
            collaborators,
        }
    }

    /// Open a list: load its tree and reconcile it with the selection.
    #[instrument(level = "debug", skip(self))]
    pub fn open_list(
        &self,
        list: ListKey,
        selection: Selection,
    ) -> ApplicationResult<OrderedListUpdater> {
        let updater = OrderedListUpdater::initialize(list, selection, self.collaborators.clone())?;
        Ok(updater.with_order_column(self.settings.order_column.clone()))
    }
}
