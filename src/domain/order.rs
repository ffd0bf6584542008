//! Order expressions and traversal callbacks

use itertools::Itertools;
use tracing::instrument;

use crate::domain::{OrderedTree, TaskId, TreeNode};

/// Column compared against task ids in order clauses.
pub const DEFAULT_ORDER_COLUMN: &str = "tasks._id";

/// Clause returned when there is nothing to order by.
pub const EMPTY_ORDER: &str = "(1)";

/// Builds an ordering expression for a query engine from ids in display order.
///
/// Each id becomes an equality clause `(<column>=<id>)`; clauses are emitted
/// bottom-to-top and joined with `", "`.
pub fn build_order_string(ids: &[TaskId], column: &str) -> String {
    if ids.is_empty() {
        return EMPTY_ORDER.to_string();
    }
    ids.iter()
        .rev()
        .map(|id| format!("({}={})", column, id))
        .join(", ")
}

/// Callback invoked once per visited node.
pub trait OrderedListNodeVisitor {
    fn visit_node(&mut self, node: &TreeNode);
}

impl<F> OrderedListNodeVisitor for F
where
    F: FnMut(&TreeNode),
{
    fn visit_node(&mut self, node: &TreeNode) {
        self(node)
    }
}

impl OrderedTree {
    /// Visits every descendant of `task_id` in pre-order. Unknown ids visit nothing.
    #[instrument(level = "trace", skip(self, visitor))]
    pub fn apply_to_descendants(&self, task_id: TaskId, visitor: &mut dyn OrderedListNodeVisitor) {
        let Some(idx) = self.node_index(task_id) else {
            return;
        };
        for (_, node) in self.descendants(idx) {
            visitor.visit_node(node);
        }
    }

    /// Visits every task node in display order.
    pub fn iterate_over_list(&self, visitor: &mut dyn OrderedListNodeVisitor) {
        for (_, node) in self.iter() {
            visitor.visit_node(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_ids_when_building_order_then_constant_clause() {
        assert_eq!(build_order_string(&[], DEFAULT_ORDER_COLUMN), "(1)");
    }

    #[test]
    fn given_single_id_when_building_order_then_no_separator() {
        assert_eq!(build_order_string(&[7], DEFAULT_ORDER_COLUMN), "(tasks._id=7)");
    }

    #[test]
    fn given_ids_when_building_order_then_reversed() {
        assert_eq!(
            build_order_string(&[1, 2, 3], "id"),
            "(id=3), (id=2), (id=1)"
        );
    }

    struct Collect(Vec<TaskId>);

    impl OrderedListNodeVisitor for Collect {
        fn visit_node(&mut self, node: &TreeNode) {
            self.0.push(node.task_id);
        }
    }

    #[test]
    fn given_struct_visitor_when_iterating_then_sees_display_order() {
        let tree = OrderedTree::from_serialized("[-1,[1,2,[3,4]],5,6]");
        let mut visitor = Collect(Vec::new());
        tree.iterate_over_list(&mut visitor);
        assert_eq!(visitor.0, vec![1, 2, 3, 4, 5, 6]);
    }
}
