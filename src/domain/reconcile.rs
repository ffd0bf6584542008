//! Drift repair against the authoritative set of live task ids

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, info, instrument, warn};

use crate::domain::{OrderedTree, ReconcileReport, TaskId, ROOT_TASK_ID};

impl OrderedTree {
    /// Brings the tree in line with `live_ids`.
    ///
    /// The ids are fully collected before the tree is touched. Unknown ids
    /// are appended to the top level in the order given; nodes whose id is
    /// not live are removed in display order, promoting their children.
    #[instrument(level = "debug", skip(self, live_ids))]
    pub fn reconcile<I>(&mut self, live_ids: I) -> ReconcileReport
    where
        I: IntoIterator<Item = TaskId>,
    {
        let mut live = HashSet::new();
        let ordered: Vec<TaskId> = live_ids
            .into_iter()
            .filter(|id| live.insert(*id))
            .collect();
        debug!("reconciling {} tasks against {} live ids", self.len(), live.len());

        let mut report = ReconcileReport::default();
        let root = self.root();

        for task_id in ordered {
            if task_id == ROOT_TASK_ID {
                warn!("ignoring reserved id {} among live tasks", ROOT_TASK_ID);
                continue;
            }
            if !self.contains(task_id) && self.append_child(root, task_id).is_some() {
                report.added.push(task_id);
            }
        }

        let stale: Vec<Index> = self
            .iter()
            .filter(|(_, node)| !live.contains(&node.task_id))
            .map(|(idx, _)| idx)
            .collect();
        for idx in stale {
            if let Some(task_id) = self.remove_promoting(idx) {
                report.removed.push(task_id);
            }
        }

        if !report.is_empty() {
            info!(
                added = report.added.len(),
                removed = report.removed.len(),
                "tree repaired"
            );
        }
        report
    }
}
