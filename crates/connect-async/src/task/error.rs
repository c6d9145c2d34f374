//! Error types for task submission and execution

use thiserror::Error;

/// Why a task did not produce its operation's result
///
/// `Operation` carries the synchronous call's own error untouched; every other
/// variant describes something the pool did to the task.
#[derive(Error, Debug)]
pub enum TaskError<E> {
    /// The operation ran and returned an error
    #[error("{0}")]
    Operation(E),

    /// The pool was shut down before the task started
    #[error("Task rejected: worker pool is shut down")]
    Rejected,

    /// The pool was shut down while the task was running
    #[error("Task terminated by worker pool shutdown")]
    Terminated,

    /// The task was cancelled through its handle
    #[error("Task was cancelled")]
    Cancelled,

    /// The operation or listener panicked, or the worker went away
    #[error("Task panicked: {0}")]
    Panicked(String),
}

impl<E> TaskError<E> {
    /// The operation's error, if the operation itself failed
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            TaskError::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Consume into the operation's error, if the operation itself failed
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            TaskError::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the task was cancelled through its handle
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }

    /// Returns true if pool shutdown rejected or terminated the task
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, TaskError::Rejected | TaskError::Terminated)
    }
}

/// Errors constructing a worker pool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No tokio runtime is available to run workers on
    #[error("No tokio runtime available; build the pool inside a runtime or pass a handle")]
    NoRuntime,

    /// Pool size must be at least one
    #[error("Invalid worker pool size: {0}")]
    InvalidSize(usize),
}
