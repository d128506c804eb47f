//! Repository-boundary error type.
//!
//! Every repository operation resolves to either a value or a [`TaskError`].
//! The error has no kinds; callers branch on success versus failure only.
//! It carries a human-readable message (which includes the HTTP status
//! code when one was received) and, optionally, the underlying cause.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause attached to a [`TaskError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failed task operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TaskError {
    /// Create an error with a message and no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error that wraps an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether an underlying cause is attached.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }
}

/// Result type for repository operations.
pub type TaskResult<T> = std::result::Result<T, TaskError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_message() {
        let err = TaskError::new("Failed to fetch tasks: 500");
        assert_eq!(err.to_string(), "Failed to fetch tasks: 500");
        assert!(!err.has_source());
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TaskError::with_source("Failed to create task", io);
        assert!(err.has_source());
        let source = err.source().unwrap();
        assert!(source.to_string().contains("refused"));
    }

    #[test]
    fn message_accessor() {
        let err = TaskError::new("Task not found");
        assert_eq!(err.message(), "Task not found");
    }

    #[test]
    fn result_alias() {
        fn example() -> TaskResult<u8> {
            Err(TaskError::new("nope"))
        }
        assert!(example().is_err());
    }
}
