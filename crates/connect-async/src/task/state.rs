//! Task lifecycle states

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Identifier assigned to each submitted task, unique per pool
pub type TaskId = u64;

/// Lifecycle of a submitted task
///
/// `Submitted -> Running -> {Succeeded, Failed}`; `Cancelled` is reachable from
/// either non-terminal state. A task rejected by a shut down pool goes straight
/// from `Submitted` to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Submitted,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    /// Returns true once the task can no longer change state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Cancelled
        )
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => TaskState::Submitted,
            1 => TaskState::Running,
            2 => TaskState::Succeeded,
            3 => TaskState::Failed,
            _ => TaskState::Cancelled,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TaskState::Submitted => 0,
            TaskState::Running => 1,
            TaskState::Succeeded => 2,
            TaskState::Failed => 3,
            TaskState::Cancelled => 4,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
            TaskState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// State shared between a task's worker and its handle
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicU8::new(TaskState::Submitted.as_u8())))
    }

    pub(crate) fn get(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move to `next` unless already terminal. Returns false if the state was final.
    pub(crate) fn advance(&self, next: TaskState) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if TaskState::from_u8(current).is_terminal() {
                    None
                } else {
                    Some(next.as_u8())
                }
            })
            .is_ok()
    }
}
