//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Data (ids,
//! order expressions, trees) goes to stdout uncoloured; diagnostics to stderr.

use std::fmt::Display;

use colored::Colorize;

use crate::domain::{EditOutcome, TaskId};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Report an edit: green verb and the new serialized tree when applied,
/// otherwise a warning naming the outcome.
pub fn edit_result(verb: &str, task_id: TaskId, outcome: EditOutcome, serialized: &str) {
    match outcome {
        EditOutcome::Applied => {
            println!("{} {}", verb.green(), task_id);
            println!("  {}", serialized.dimmed());
        }
        other => warning(&format!("task {}: {}", task_id, other)),
    }
}

/// Print list name heading a sync report (cyan bold)
pub fn list_header(list: &(impl Display + ?Sized)) {
    println!("{}", list.to_string().cyan().bold());
}

/// Print task appended during sync (green +)
pub fn task_added(task_id: TaskId) {
    println!("  {} {}", "+".green(), task_id);
}

/// Print task dropped during sync (red -)
pub fn task_removed(task_id: TaskId) {
    println!("  {} {}", "-".red(), task_id);
}

/// Print plain data line
pub fn data(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
