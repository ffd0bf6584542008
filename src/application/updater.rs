//! Ordered list updater
//!
//! Binds one list and its selection to an [`OrderedTree`] and to the
//! collaborators that store the tree, enumerate live tasks and display them.
//! Opening a list repairs drift silently; every applied edit is persisted
//! with a sync request and followed by a view refresh.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    build_order_string, EditOutcome, ListKey, OrderedListNodeVisitor, OrderedTree,
    ReconcileReport, Selection, TaskId, TreeNode, DEFAULT_ORDER_COLUMN,
};
use crate::infrastructure::traits::{SelectionView, TaskSource, TreeStore};

/// External collaborators of an updater.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn TreeStore>,
    pub tasks: Arc<dyn TaskSource>,
    pub view: Arc<dyn SelectionView>,
}

impl Collaborators {
    pub fn new(
        store: Arc<dyn TreeStore>,
        tasks: Arc<dyn TaskSource>,
        view: Arc<dyn SelectionView>,
    ) -> Self {
        Self { store, tasks, view }
    }
}

/// Manages the manual ordering and nesting of one task list.
///
/// Not synchronized: callers serialize access (`&mut self` for edits).
pub struct OrderedListUpdater {
    list: ListKey,
    selection: Selection,
    tree: OrderedTree,
    collaborators: Collaborators,
    order_column: String,
    repaired: ReconcileReport,
}

impl OrderedListUpdater {
    /// Loads the stored tree of `list` and reconciles it with the tasks
    /// currently matching `selection`.
    #[instrument(level = "debug", skip(collaborators))]
    pub fn initialize(
        list: ListKey,
        selection: Selection,
        collaborators: Collaborators,
    ) -> ApplicationResult<Self> {
        let serialized = collaborators
            .store
            .fetch_serialized_tree(&list, &selection)
            .with_context("fetch tree", &list)?;
        Self::initialize_from_serialized(list, selection, &serialized, collaborators)
    }

    /// Like [`initialize`](Self::initialize) with an already fetched tree.
    /// Malformed input starts from an empty tree.
    #[instrument(level = "debug", skip(serialized, collaborators))]
    pub fn initialize_from_serialized(
        list: ListKey,
        selection: Selection,
        serialized: &str,
        collaborators: Collaborators,
    ) -> ApplicationResult<Self> {
        let mut parsed = 0usize;
        let tree = OrderedTree::from_serialized_with(serialized, |_| parsed += 1);
        debug!("list {}: parsed {} nodes", list, parsed);

        let mut updater = Self {
            list,
            selection,
            tree,
            collaborators,
            order_column: DEFAULT_ORDER_COLUMN.to_string(),
            repaired: ReconcileReport::default(),
        };
        updater.repaired = updater.reconcile()?;
        Ok(updater)
    }

    /// Column used by [`order_string`](Self::order_string).
    pub fn with_order_column(mut self, column: impl Into<String>) -> Self {
        self.order_column = column.into();
        self
    }

    /// Repairs the tree against the live task ids. Changes are persisted
    /// without a sync request.
    #[instrument(level = "debug", skip(self), fields(list = %self.list))]
    pub fn reconcile(&mut self) -> ApplicationResult<ReconcileReport> {
        let live = self
            .collaborators
            .tasks
            .fetch_matching_ids(&self.selection)
            .with_context("fetch matching tasks", &self.selection)?;
        let before = self.tree.clone();
        let report = self.tree.reconcile(live);
        if !report.is_empty() {
            if let Err(e) = self.write_serialization(false) {
                warn!("list {}: repair rolled back, persist failed", self.list);
                self.tree = before;
                return Err(e);
            }
        }
        Ok(report)
    }

    pub fn list(&self) -> &ListKey {
        &self.list
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tree(&self) -> &OrderedTree {
        &self.tree
    }

    /// Changes made by the repair that ran while opening the list.
    pub fn repaired(&self) -> &ReconcileReport {
        &self.repaired
    }

    pub fn serialized(&self) -> String {
        self.tree.serialize()
    }

    // ------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------

    /// Depth of the task; 0 for unknown tasks.
    pub fn indent_for_task(&self, task_id: TaskId) -> i32 {
        self.tree.indent_of(task_id).unwrap_or(0)
    }

    pub fn find_node_for_task(&self, task_id: TaskId) -> Option<&TreeNode> {
        self.tree.find_node(task_id)
    }

    pub fn ordered_ids(&self) -> Vec<TaskId> {
        self.tree.ordered_ids()
    }

    pub fn order_string(&self) -> String {
        build_order_string(&self.ordered_ids(), &self.order_column)
    }

    pub fn apply_to_descendants(&self, task_id: TaskId, visitor: &mut dyn OrderedListNodeVisitor) {
        self.tree.apply_to_descendants(task_id, visitor)
    }

    pub fn iterate_over_list(&self, visitor: &mut dyn OrderedListNodeVisitor) {
        self.tree.iterate_over_list(visitor)
    }

    // ------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------

    pub fn indent(&mut self, task_id: TaskId, delta: i32) -> ApplicationResult<EditOutcome> {
        self.apply(|tree| tree.indent(task_id, delta))
    }

    pub fn move_to(&mut self, task_id: TaskId, before_id: TaskId) -> ApplicationResult<EditOutcome> {
        self.apply(|tree| tree.move_to(task_id, before_id))
    }

    pub fn move_to_parent_of(
        &mut self,
        task_id: TaskId,
        reference_id: TaskId,
    ) -> ApplicationResult<EditOutcome> {
        self.apply(|tree| tree.move_to_parent_of(task_id, reference_id))
    }

    pub fn on_create_task(&mut self, task_id: TaskId) -> ApplicationResult<EditOutcome> {
        self.apply(|tree| tree.on_create_task(task_id))
    }

    pub fn on_delete_task(&mut self, task_id: TaskId) -> ApplicationResult<EditOutcome> {
        self.apply(|tree| tree.on_delete_task(task_id))
    }

    /// Runs `edit`; an applied edit is persisted with a sync request and the
    /// view refreshed. If persisting fails the tree is restored.
    fn apply<F>(&mut self, edit: F) -> ApplicationResult<EditOutcome>
    where
        F: FnOnce(&mut OrderedTree) -> EditOutcome,
    {
        let before = self.tree.clone();
        let outcome = edit(&mut self.tree);
        if !outcome.is_applied() {
            debug!("list {}: edit not applied ({})", self.list, outcome);
            return Ok(outcome);
        }
        if let Err(e) = self.write_serialization(true) {
            warn!("list {}: edit rolled back, persist failed", self.list);
            self.tree = before;
            return Err(e);
        }
        self.collaborators.view.refresh(&self.selection);
        Ok(outcome)
    }

    fn write_serialization(&self, request_sync: bool) -> ApplicationResult<()> {
        let serialized = self.tree.serialize();
        self.collaborators
            .store
            .persist(&self.list, &serialized, request_sync)
            .with_context("persist tree", &self.list)
    }
}
