use termtree::Tree;
use tracing::instrument;

use crate::domain::OrderedTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self, root_label: &str) -> Tree<String>;
}

impl TreeNodeConvert for OrderedTree {
    /// Builds the display tree from the pre-order walk: a node is folded
    /// into its parent once a node at the same or a shallower indent follows.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root_label: &str) -> Tree<String> {
        let mut open: Vec<(i32, Tree<String>)> = vec![(-1, Tree::new(root_label.to_string()))];
        for (_, node) in self.iter() {
            close_until(&mut open, node.indent);
            open.push((node.indent, Tree::new(node.task_id.to_string())));
        }
        close_until(&mut open, -1);
        open.pop()
            .map(|(_, tree)| tree)
            .unwrap_or_else(|| Tree::new(root_label.to_string()))
    }
}

/// Pops every open subtree at `indent` or deeper into its parent; the root stays.
fn close_until(open: &mut Vec<(i32, Tree<String>)>, indent: i32) {
    while open.len() > 1 && open.last().is_some_and(|(depth, _)| *depth >= indent) {
        if let Some((_, child)) = open.pop() {
            if let Some((_, parent)) = open.last_mut() {
                parent.push(child);
            }
        }
    }
}
