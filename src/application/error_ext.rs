//! Error conversion helpers for collaborator calls
//!
//! Provides an extension trait for cleaner error handling with list context.

use std::fmt::Display;
use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add action and subject context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// store.persist(&list, &serialized, true)
    ///     .with_context("persist tree", &list)?;
    /// ```
    fn with_context(self, action: &str, subject: &dyn Display) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: &str, subject: &dyn Display) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, subject),
            source: Box::new(e),
        })
    }
}
