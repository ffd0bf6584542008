//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::TaskId;

/// Ordered, hierarchical task lists: show, reorder and nest tasks of a list
#[derive(Parser, Debug)]
#[command(name = "tasktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Data directory (default: settings base_dir)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// List identity shared by all list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// List key
    pub list: String,

    /// Selection supplying the live task ids (default: the list key)
    #[arg(short, long)]
    pub selection: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show list as tree
    Show {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Print task ids in display order
    Ids {
        #[command(flatten)]
        list: ListArgs,
        /// Print the indent next to each id
        #[arg(short, long)]
        indent: bool,
    },

    /// Print the ordering expression for a query
    Order {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Indent task under its previous sibling
    Indent {
        #[command(flatten)]
        list: ListArgs,
        /// Task id
        task: TaskId,
    },

    /// Outdent task to follow its parent
    Outdent {
        #[command(flatten)]
        list: ListArgs,
        /// Task id
        task: TaskId,
    },

    /// Move task (with subtree) before another task or to the end
    Move {
        #[command(flatten)]
        list: ListArgs,
        /// Task id
        task: TaskId,
        /// Place before this task
        #[arg(long, conflicts_with = "end", required_unless_present = "end")]
        before: Option<TaskId>,
        /// Place at the end of the top level
        #[arg(long)]
        end: bool,
    },

    /// Make task the last sibling of a reference task
    MoveBeside {
        #[command(flatten)]
        list: ListArgs,
        /// Task id
        task: TaskId,
        /// Reference task id
        reference: TaskId,
    },

    /// Add a newly created task at the end
    Create {
        #[command(flatten)]
        list: ListArgs,
        /// Task id
        task: TaskId,
    },

    /// Remove a deleted task, promoting its children
    Delete {
        #[command(flatten)]
        list: ListArgs,
        /// Task id
        task: TaskId,
    },

    /// Repair list against live task ids and report changes
    Sync {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
