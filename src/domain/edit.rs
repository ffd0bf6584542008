//! Structural edits on the ordered tree
//!
//! Each edit either applies completely or leaves the tree untouched and says
//! why. Persisting and refreshing views is the caller's business.

use tracing::{debug, instrument};

use crate::domain::{EditOutcome, OrderedTree, RejectReason, TaskId, ROOT_TASK_ID};

impl OrderedTree {
    /// Indents (`delta > 0`) or outdents (`delta < 0`) a task by one level.
    ///
    /// Indenting makes the task the last child of its previous sibling.
    /// Outdenting places it directly after its former parent.
    #[instrument(level = "debug", skip(self))]
    pub fn indent(&mut self, task_id: TaskId, delta: i32) -> EditOutcome {
        let Some(idx) = self.node_index(task_id) else {
            return EditOutcome::NotFound;
        };
        if delta == 0 {
            return EditOutcome::Rejected(RejectReason::ZeroDelta);
        }
        let Some(parent) = self.get_node(idx).and_then(|node| node.parent) else {
            return EditOutcome::NotFound;
        };
        let Some(position) = self.position_of(idx) else {
            return EditOutcome::NotFound;
        };

        if delta > 0 {
            if position == 0 {
                return EditOutcome::Rejected(RejectReason::FirstChild);
            }
            let Some(new_parent) = self
                .get_node(parent)
                .and_then(|p| p.children.get(position - 1).copied())
            else {
                return EditOutcome::NotFound;
            };
            self.detach(idx);
            self.attach(idx, new_parent, None);
        } else {
            if parent == self.root() {
                return EditOutcome::Rejected(RejectReason::TopLevel);
            }
            let (Some(grandparent), Some(parent_position)) = (
                self.get_node(parent).and_then(|p| p.parent),
                self.position_of(parent),
            ) else {
                return EditOutcome::Rejected(RejectReason::TopLevel);
            };
            self.detach(idx);
            self.attach(idx, grandparent, Some(parent_position + 1));
        }

        debug!(task_id, delta, "indent applied");
        EditOutcome::Applied
    }

    /// Moves a task (with its subtree) directly before `before_id`, adopting
    /// that task's parent. `before_id == -1` moves it to the end of the top level.
    #[instrument(level = "debug", skip(self))]
    pub fn move_to(&mut self, task_id: TaskId, before_id: TaskId) -> EditOutcome {
        let Some(idx) = self.node_index(task_id) else {
            return EditOutcome::NotFound;
        };

        if before_id == ROOT_TASK_ID {
            let root = self.root();
            self.detach(idx);
            self.attach(idx, root, None);
            return EditOutcome::Applied;
        }

        let Some(before) = self.node_index(before_id) else {
            return EditOutcome::NotFound;
        };
        if self.is_descendant_of(before, idx) {
            return EditOutcome::Rejected(RejectReason::WouldCycle);
        }

        let old_parent = self.get_node(idx).and_then(|node| node.parent);
        let (Some(new_parent), Some(mut before_position), Some(node_position)) = (
            self.get_node(before).and_then(|node| node.parent),
            self.position_of(before),
            self.position_of(idx),
        ) else {
            return EditOutcome::NotFound;
        };

        self.detach(idx);
        // Same sibling list: removal shifted the target slot up by one
        if old_parent == Some(new_parent) && before_position > node_position {
            before_position -= 1;
        }
        self.attach(idx, new_parent, Some(before_position));

        debug!(task_id, before_id, "move applied");
        EditOutcome::Applied
    }

    /// Makes `task_id` the last child of `reference_id`'s parent, i.e. a new
    /// last sibling of the reference task.
    #[instrument(level = "debug", skip(self))]
    pub fn move_to_parent_of(&mut self, task_id: TaskId, reference_id: TaskId) -> EditOutcome {
        let Some(reference) = self.node_index(reference_id) else {
            return EditOutcome::NotFound;
        };
        let Some(idx) = self.node_index(task_id) else {
            return EditOutcome::NotFound;
        };
        let Some(new_parent) = self.get_node(reference).and_then(|node| node.parent) else {
            return EditOutcome::NotFound;
        };
        if self.is_descendant_of(new_parent, idx) {
            return EditOutcome::Rejected(RejectReason::WouldCycle);
        }

        self.detach(idx);
        self.attach(idx, new_parent, None);
        EditOutcome::Applied
    }

    /// Appends a newly created task at the end of the top level.
    #[instrument(level = "debug", skip(self))]
    pub fn on_create_task(&mut self, task_id: TaskId) -> EditOutcome {
        if task_id < 0 {
            return EditOutcome::Rejected(RejectReason::InvalidId);
        }
        if self.contains(task_id) {
            return EditOutcome::Rejected(RejectReason::AlreadyPresent);
        }
        let root = self.root();
        match self.append_child(root, task_id) {
            Some(_) => EditOutcome::Applied,
            None => EditOutcome::NotFound,
        }
    }

    /// Removes a deleted task; its children take its place in its parent.
    #[instrument(level = "debug", skip(self))]
    pub fn on_delete_task(&mut self, task_id: TaskId) -> EditOutcome {
        let Some(idx) = self.node_index(task_id) else {
            return EditOutcome::NotFound;
        };
        match self.remove_promoting(idx) {
            Some(_) => EditOutcome::Applied,
            None => EditOutcome::NotFound,
        }
    }
}
