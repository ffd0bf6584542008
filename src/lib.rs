//! tasktree: manual ordering and nesting of task lists
//!
//! A list's arrangement is an [`domain::OrderedTree`] stored in a compact
//! nested-array form such as `[-1,[1,2,[3,4]],5,6]`. The
//! [`application::OrderedListUpdater`] keeps that tree consistent with the
//! tasks a selection currently matches and applies structural edits.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{Collaborators, OrderedListUpdater};
pub use config::Settings;
pub use domain::{EditOutcome, ListKey, OrderedTree, Selection, TaskId, ROOT_TASK_ID};
