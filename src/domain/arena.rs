use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::{DomainError, DomainResult, TaskId, ROOT_TASK_ID};

/// Tree node in the arena-based hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Task this node orders; `-1` only for the root sentinel
    pub task_id: TaskId,
    /// Index of parent node in the arena, None for the root sentinel
    pub parent: Option<Index>,
    /// Cached depth: 0 for top-level nodes, -1 for the sentinel
    pub indent: i32,
    /// Indices of child nodes in display order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based ordered tree over externally owned task ids.
///
/// Every node is owned by the arena and addressed by a generational `Index`;
/// parent and child links are plain indices, so no reference cycles exist.
/// A synthetic root sentinel (`task_id == -1`, `indent == -1`) is the parent
/// of all top-level nodes. The id index covers every live node except the
/// sentinel and is updated at every structural change.
#[derive(Debug, Clone)]
pub struct OrderedTree {
    /// Arena storage for all tree nodes, including the sentinel
    arena: Arena<TreeNode>,
    /// Index of the root sentinel
    root: Index,
    /// Task id to arena index, excluding the sentinel
    index: HashMap<TaskId, Index>,
}

impl Default for OrderedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedTree {
    /// Creates an empty tree holding only the root sentinel.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            task_id: ROOT_TASK_ID,
            parent: None,
            indent: -1,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            index: HashMap::new(),
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn node_index(&self, task_id: TaskId) -> Option<Index> {
        self.index.get(&task_id).copied()
    }

    pub fn find_node(&self, task_id: TaskId) -> Option<&TreeNode> {
        self.node_index(task_id).and_then(|idx| self.arena.get(idx))
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.index.contains_key(&task_id)
    }

    /// Number of task nodes (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn indent_of(&self, task_id: TaskId) -> Option<i32> {
        self.find_node(task_id).map(|node| node.indent)
    }

    /// Task id of the parent node; `-1` for top-level nodes.
    pub fn parent_id(&self, task_id: TaskId) -> Option<TaskId> {
        let parent = self.find_node(task_id)?.parent?;
        self.arena.get(parent).map(|node| node.task_id)
    }

    /// Position of the node among its parent's children.
    pub fn position_in_parent(&self, task_id: TaskId) -> Option<usize> {
        self.position_of(self.node_index(task_id)?)
    }

    /// Task ids of the direct children of `idx`, in display order.
    pub fn child_ids(&self, idx: Index) -> Vec<TaskId> {
        self.arena
            .get(idx)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.arena.get(child))
                    .map(|child| child.task_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pre-order iterator over every task node (sentinel excluded).
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order iterator over the descendants of `idx` (`idx` excluded).
    pub fn descendants(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, idx)
    }

    /// All task ids in display order: a node before its descendants,
    /// descendants before the next sibling.
    #[instrument(level = "trace", skip(self))]
    pub fn ordered_ids(&self) -> Vec<TaskId> {
        self.iter().map(|(_, node)| node.task_id).collect()
    }

    /// True iff walking up from `desc` reaches `ancestor` before the sentinel.
    /// A node counts as its own descendant.
    pub fn is_descendant_of(&self, desc: Index, ancestor: Index) -> bool {
        let mut current = Some(desc);
        while let Some(idx) = current {
            if idx == self.root {
                return false;
            }
            if idx == ancestor {
                return true;
            }
            current = self.arena.get(idx).and_then(|node| node.parent);
        }
        false
    }

    /// Checks index/arena agreement, parent/child link agreement, indent
    /// consistency and reachability from the sentinel.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> DomainResult<()> {
        let root = self
            .arena
            .get(self.root)
            .ok_or_else(|| DomainError::Inconsistent("root sentinel missing".into()))?;
        if root.parent.is_some() || root.indent != -1 || root.task_id != ROOT_TASK_ID {
            return Err(DomainError::Inconsistent("root sentinel altered".into()));
        }

        let mut reached = 0usize;
        for (idx, node) in self.iter() {
            reached += 1;
            if reached >= self.arena.len() {
                return Err(DomainError::Inconsistent(format!(
                    "task {} reached more than once",
                    node.task_id
                )));
            }
            let parent = node
                .parent
                .and_then(|p| self.arena.get(p))
                .ok_or_else(|| {
                    DomainError::Inconsistent(format!("task {} has no parent", node.task_id))
                })?;
            if !parent.children.contains(&idx) {
                return Err(DomainError::Inconsistent(format!(
                    "task {} is not a child of its parent {}",
                    node.task_id, parent.task_id
                )));
            }
            if node.indent != parent.indent + 1 {
                return Err(DomainError::Inconsistent(format!(
                    "task {} has indent {}, parent {} has {}",
                    node.task_id, node.indent, parent.task_id, parent.indent
                )));
            }
            if self.index.get(&node.task_id) != Some(&idx) {
                return Err(DomainError::Inconsistent(format!(
                    "task {} is not indexed",
                    node.task_id
                )));
            }
        }

        if reached != self.index.len() || self.arena.len() != reached + 1 {
            return Err(DomainError::Inconsistent(format!(
                "{} reachable tasks, {} indexed, {} allocated",
                reached,
                self.index.len(),
                self.arena.len() - 1
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------
    // Structural primitives. Callers keep the id index unique.
    // ------------------------------------------------------------

    /// Appends a new node for `task_id` as the last child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn append_child(&mut self, parent: Index, task_id: TaskId) -> Option<Index> {
        debug_assert!(!self.contains(task_id), "duplicate task id {task_id}");
        let indent = self.arena.get(parent)?.indent + 1;
        let idx = self.arena.insert(TreeNode {
            task_id,
            parent: Some(parent),
            indent,
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(idx);
        }
        self.index.insert(task_id, idx);
        Some(idx)
    }

    pub(crate) fn position_of(&self, idx: Index) -> Option<usize> {
        let parent = self.arena.get(self.arena.get(idx)?.parent?)?;
        parent.children.iter().position(|&child| child == idx)
    }

    /// Unlinks `idx` from its parent's children; returns its former position.
    /// The node keeps its stale parent link until re-attached.
    pub(crate) fn detach(&mut self, idx: Index) -> Option<usize> {
        let parent = self.arena.get(idx)?.parent?;
        let siblings = &mut self.arena.get_mut(parent)?.children;
        let position = siblings.iter().position(|&child| child == idx)?;
        siblings.remove(position);
        Some(position)
    }

    /// Links a detached node under `parent` at `position` (appended when
    /// `None`) and recomputes the indents of its subtree.
    pub(crate) fn attach(&mut self, idx: Index, parent: Index, position: Option<usize>) {
        let Some(parent_node) = self.arena.get_mut(parent) else {
            return;
        };
        let parent_indent = parent_node.indent;
        let at = position
            .unwrap_or(parent_node.children.len())
            .min(parent_node.children.len());
        parent_node.children.insert(at, idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = Some(parent);
        }
        self.set_indent(idx, parent_indent + 1);
    }

    /// Removes `idx` and splices its children into its former slot in the
    /// parent, preserving their order.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn remove_promoting(&mut self, idx: Index) -> Option<TaskId> {
        if idx == self.root {
            return None;
        }
        let parent = self.arena.get(idx)?.parent?;
        let parent_indent = self.arena.get(parent)?.indent;
        let position = self.detach(idx)?;
        let node = self.arena.remove(idx)?;
        self.index.remove(&node.task_id);

        for &child in &node.children {
            if let Some(child) = self.arena.get_mut(child) {
                child.parent = Some(parent);
            }
        }
        if let Some(parent) = self.arena.get_mut(parent) {
            parent
                .children
                .splice(position..position, node.children.iter().copied());
        }
        for &child in &node.children {
            self.set_indent(child, parent_indent + 1);
        }
        Some(node.task_id)
    }

    /// Sets the indent of `idx` and propagates `parent + 1` through its subtree.
    pub(crate) fn set_indent(&mut self, idx: Index, indent: i32) {
        let mut stack = vec![(idx, indent)];
        while let Some((current, indent)) = stack.pop() {
            if let Some(node) = self.arena.get_mut(current) {
                node.indent = indent;
                stack.extend(node.children.iter().map(|&child| (child, indent + 1)));
            }
        }
    }
}

/// Pre-order iterator driven by an explicit stack.
pub struct TreeIterator<'a> {
    tree: &'a OrderedTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a OrderedTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if let Some(node) = tree.get_node(start) {
            // Push children in reverse order for top-to-bottom traversal
            stack.extend(node.children.iter().rev().copied());
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}
