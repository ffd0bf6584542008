//! Domain entities: identifiers, list/selection identity and edit results

use std::fmt;

use crate::domain::DomainError;

/// Identifier of a task, assigned by the task store.
pub type TaskId = i64;

/// Identifier of the synthetic root sentinel. Also used as the
/// "move to end of top level" marker and as the parent id of top-level nodes.
pub const ROOT_TASK_ID: TaskId = -1;

/// Identity under which a serialized tree is stored.
///
/// Keys double as file stems in the file-backed store, so they are restricted
/// to ASCII alphanumerics plus `-`, `_` and `.`, and may not start with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListKey(String);

impl ListKey {
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        let valid_chars = key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if key.is_empty() || key.starts_with('.') || !valid_chars {
            return Err(DomainError::InvalidListKey(key));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selection criterion deciding which tasks belong to a list view.
///
/// The criterion is opaque to the tree; only the task source interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Stable name of the selection (e.g. "inbox")
    pub name: String,
    /// Source-specific criterion, e.g. a query expression
    pub criterion: String,
}

impl Selection {
    pub fn new(name: impl Into<String>, criterion: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            criterion: criterion.into(),
        }
    }

    /// Selection identified by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.criterion.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.criterion)
        }
    }
}

/// Why a structural edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Indent requested with a delta of zero
    ZeroDelta,
    /// The first child of a parent has no previous sibling to indent under
    FirstChild,
    /// A top-level node cannot be outdented
    TopLevel,
    /// The edit would place a node inside its own subtree
    WouldCycle,
    /// Negative (placeholder) task id
    InvalidId,
    /// The task is already part of the tree
    AlreadyPresent,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RejectReason::ZeroDelta => "indent delta is zero",
            RejectReason::FirstChild => "first child cannot be indented",
            RejectReason::TopLevel => "top-level task cannot be outdented",
            RejectReason::WouldCycle => "task cannot be moved into its own subtree",
            RejectReason::InvalidId => "task id is negative",
            RejectReason::AlreadyPresent => "task is already in the list",
        };
        f.write_str(msg)
    }
}

/// Result of a structural edit.
///
/// Only `Applied` changes the tree; the other variants leave it, and the
/// persisted form, untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    NotFound,
    Rejected(RejectReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Applied => f.write_str("applied"),
            EditOutcome::NotFound => f.write_str("task not found"),
            EditOutcome::Rejected(reason) => write!(f, "rejected: {}", reason),
        }
    }
}

/// Changes made while reconciling the tree against the live task ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids appended as new top-level nodes, in source order
    pub added: Vec<TaskId>,
    /// Ids removed (children promoted), in former display order
    pub removed: Vec<TaskId>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
