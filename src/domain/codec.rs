//! Nested-array text format for ordered trees
//!
//! ```text
//! tree       := '[' selfId (',' childEntry)* ']'
//! childEntry := integerId | tree
//! ```
//!
//! `[-1,[1,2,[3,4]],5,6]` is the sentinel with top-level children 1 (holding
//! leaf 2 and node 3, which holds leaf 4), leaf 5 and leaf 6.

use tracing::{error, instrument, warn};

use crate::domain::{DomainError, DomainResult, OrderedTree, TaskId, TreeNode, ROOT_TASK_ID};

/// Serialized form of a tree without any tasks.
pub const EMPTY_TREE: &str = "[-1]";

/// Parses a serialized tree.
pub fn deserialize(serialized: &str) -> DomainResult<OrderedTree> {
    deserialize_with(serialized, |_| {})
}

/// Parses a serialized tree, calling `after_add` for every node as it is linked in.
///
/// Whitespace between tokens is ignored. The head of the top-level array is
/// ignored; the sentinel is always `-1`. `[]` is the empty tree. A repeated
/// id is dropped and the children it carried are attached to the current
/// parent in its place. Nesting depth is bounded only by memory.
#[instrument(level = "debug", skip(serialized, after_add), fields(len = serialized.len()))]
pub fn deserialize_with<F>(serialized: &str, mut after_add: F) -> DomainResult<OrderedTree>
where
    F: FnMut(&TreeNode),
{
    let mut tree = OrderedTree::new();
    let mut scanner = Scanner::new(serialized);

    scanner.expect(b'[')?;
    if scanner.peek() == Some(b']') {
        scanner.advance();
    } else {
        scanner.integer()?;
        // Targets for the entries of each open array
        let mut stack = vec![tree.root()];
        while let Some(&parent) = stack.last() {
            match scanner.peek() {
                Some(b']') => {
                    scanner.advance();
                    stack.pop();
                }
                Some(b',') => {
                    scanner.advance();
                    let nested = scanner.peek() == Some(b'[');
                    if nested {
                        scanner.advance();
                    }
                    let task_id = scanner.integer()?;

                    let target = if task_id == ROOT_TASK_ID || tree.contains(task_id) {
                        warn!(task_id, "dropping repeated task id, keeping its children in place");
                        parent
                    } else {
                        let idx = tree.append_child(parent, task_id).ok_or_else(|| {
                            DomainError::Inconsistent("parent vanished while parsing".into())
                        })?;
                        if let Some(node) = tree.get_node(idx) {
                            after_add(node);
                        }
                        idx
                    };
                    if nested {
                        stack.push(target);
                    }
                }
                other => return Err(scanner.unexpected(other, "',' or ']'")),
            }
        }
    }

    match scanner.peek() {
        None => Ok(tree),
        other => Err(scanner.unexpected(other, "end of input")),
    }
}

/// Cursor over the serialized text.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.byte().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }
    }

    /// Next significant byte, without consuming it.
    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.byte()
    }

    fn expect(&mut self, expected: u8) -> DomainResult<()> {
        match self.peek() {
            Some(b) if b == expected => {
                self.advance();
                Ok(())
            }
            other => Err(self.unexpected(other, &format!("'{}'", expected as char))),
        }
    }

    /// Optional minus sign followed by decimal digits.
    fn integer(&mut self) -> DomainResult<TaskId> {
        self.skip_whitespace();
        let start = self.pos;
        if self.byte() == Some(b'-') {
            self.advance();
        }
        while self.byte().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        let fractional = matches!(self.byte(), Some(b'.' | b'e' | b'E'));
        match self.input[start..self.pos].parse::<TaskId>() {
            Ok(id) if !fractional => Ok(id),
            _ => {
                self.pos = start;
                Err(self.unexpected(self.byte(), "integer task id"))
            }
        }
    }

    fn unexpected(&self, found: Option<u8>, wanted: &str) -> DomainError {
        match found.and(self.input[self.pos..].chars().next()) {
            Some(c) => DomainError::malformed(format!(
                "expected {} at offset {}, found {:?}",
                wanted, self.pos, c
            )),
            None => DomainError::malformed(format!("expected {}, found end of input", wanted)),
        }
    }
}

/// Serializes depth-first: own id first, then each child as a bare id (leaf)
/// or a nested array (inner node), in child order.
#[instrument(level = "trace", skip(tree))]
pub fn serialize(tree: &OrderedTree) -> String {
    let mut out = format!("[{}", ROOT_TASK_ID);
    let mut stack = vec![(tree.root(), 0usize)];

    while let Some((idx, cursor)) = stack.last_mut() {
        let Some(node) = tree.get_node(*idx) else {
            stack.pop();
            continue;
        };
        let Some(&child_idx) = node.children.get(*cursor) else {
            out.push(']');
            stack.pop();
            continue;
        };
        *cursor += 1;

        let Some(child) = tree.get_node(child_idx) else {
            continue;
        };
        out.push(',');
        if child.is_leaf() {
            out.push_str(&child.task_id.to_string());
        } else {
            out.push('[');
            out.push_str(&child.task_id.to_string());
            stack.push((child_idx, 0));
        }
    }

    out
}

impl OrderedTree {
    /// Fail-soft parse: malformed input is logged and yields an empty tree.
    pub fn from_serialized(serialized: &str) -> Self {
        Self::from_serialized_with(serialized, |_| {})
    }

    pub fn from_serialized_with<F>(serialized: &str, after_add: F) -> Self
    where
        F: FnMut(&TreeNode),
    {
        deserialize_with(serialized, after_add).unwrap_or_else(|e| {
            error!("Error building tree model: {}", e);
            OrderedTree::new()
        })
    }

    pub fn serialize(&self) -> String {
        serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_tree_when_serializing_then_only_sentinel() {
        assert_eq!(serialize(&OrderedTree::new()), EMPTY_TREE);
    }

    #[test]
    fn given_nested_input_when_parsing_then_after_add_sees_every_node() {
        let mut seen = Vec::new();
        let tree = deserialize_with("[-1,[1,2,[3,4]],5]", |node| {
            seen.push((node.task_id, node.indent))
        })
        .unwrap();
        assert_eq!(seen, vec![(1, 0), (2, 1), (3, 1), (4, 2), (5, 0)]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn given_nesting_beyond_json_limits_when_parsing_then_full_depth_kept() {
        let depth = 5_000;
        let mut text = String::from("[-1");
        for id in 0..depth {
            text.push_str(&format!(",[{}", id));
        }
        text.push_str(",5000");
        text.push_str(&"]".repeat(depth + 1));

        let tree = deserialize(&text).unwrap();
        assert_eq!(tree.len(), depth + 1);
        assert_eq!(tree.indent_of(5_000), Some(depth as i32));
        assert_eq!(tree.serialize(), text);
    }

    #[test]
    fn given_trailing_text_when_parsing_then_malformed() {
        let err = deserialize("[-1,1] 2").unwrap_err();
        assert!(err.to_string().contains("end of input"), "{err}");
    }

    #[test]
    fn given_overflowing_id_when_parsing_then_malformed() {
        assert!(deserialize("[-1,99999999999999999999]").is_err());
    }

    #[test]
    fn given_garbage_when_parsing_fail_soft_then_empty_tree() {
        let tree = OrderedTree::from_serialized("[-1, [1, 2");
        assert!(tree.is_empty());
        assert_eq!(tree.serialize(), EMPTY_TREE);
    }
}
