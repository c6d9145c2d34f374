//! Handle to a submitted task's eventual outcome

use super::error::TaskError;
use super::state::{SharedState, TaskId, TaskState};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{oneshot, watch};

pub(crate) type Outcome<T, E> = Result<T, TaskError<E>>;

/// Handle to the eventual outcome of a submitted task
///
/// Await it, block on it with [`wait`](TaskHandle::wait), or poll it with
/// [`try_result`](TaskHandle::try_result). Dropping the handle does not cancel
/// the task.
#[must_use = "dropping a TaskHandle discards the task's outcome"]
pub struct TaskHandle<T, E> {
    id: TaskId,
    operation: &'static str,
    state: SharedState,
    cancel: watch::Sender<bool>,
    outcome: oneshot::Receiver<Outcome<T, E>>,
    resolved: bool,
}

impl<T, E> TaskHandle<T, E> {
    pub(crate) fn new(
        id: TaskId,
        operation: &'static str,
        state: SharedState,
        cancel: watch::Sender<bool>,
        outcome: oneshot::Receiver<Outcome<T, E>>,
    ) -> Self {
        Self {
            id,
            operation,
            state,
            cancel,
            outcome,
            resolved: false,
        }
    }

    /// Pool-unique id of this task
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Name of the operation this task runs
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    /// Returns true once the task has reached a terminal state
    ///
    /// A terminal state is only published after the listener, if any, has run.
    pub fn is_done(&self) -> bool {
        self.state().is_terminal()
    }

    /// Request cancellation
    ///
    /// A queued task never starts. A running task's handle resolves to
    /// [`TaskError::Cancelled`] immediately; the blocking call itself cannot be
    /// interrupted and runs to completion with its outcome discarded.
    ///
    /// Returns false if the task had already finished.
    pub fn cancel(&self) -> bool {
        if self.is_done() {
            return false;
        }
        self.cancel.send_replace(true);
        true
    }

    /// Take the outcome if it is ready, without blocking
    ///
    /// Returns `None` while the task is still pending, and after the outcome
    /// has already been taken.
    pub fn try_result(&mut self) -> Option<Outcome<T, E>> {
        if self.resolved {
            return None;
        }
        match self.outcome.try_recv() {
            Ok(outcome) => {
                self.resolved = true;
                Some(outcome)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.resolved = true;
                Some(Err(lost_worker()))
            }
        }
    }

    /// Block the current thread until the task finishes
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context; await
    /// the handle there instead.
    pub fn wait(self) -> Outcome<T, E> {
        self.outcome
            .blocking_recv()
            .unwrap_or_else(|_| Err(lost_worker()))
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Outcome<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        if this.resolved {
            return Poll::Ready(Err(TaskError::Panicked(
                "task outcome was already taken".to_string(),
            )));
        }
        match Pin::new(&mut this.outcome).poll(cx) {
            Poll::Ready(received) => {
                this.resolved = true;
                Poll::Ready(received.unwrap_or_else(|_| Err(lost_worker())))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("state", &self.state())
            .finish()
    }
}

// The worker dropped its sender without reporting, which only happens when it
// panicked outside the guarded call or its runtime shut down.
pub(crate) fn lost_worker<E>() -> TaskError<E> {
    TaskError::Panicked("worker ended without reporting an outcome".to_string())
}
