//! Completion listeners
//!
//! A listener is told about a task's outcome on the worker, before the task's
//! handle resolves. Exactly one of its two methods is called, exactly once.

use super::error::TaskError;
use std::sync::Arc;

/// Callbacks notified when a submitted task finishes
pub trait CompletionListener<Req, Res, E>: Send {
    /// The operation returned a result for `request`
    fn on_success(&self, request: &Req, result: &Res);

    /// The task failed; `error` is the same value the handle will yield
    fn on_failure(&self, error: &TaskError<E>);
}

impl<Req, Res, E, L> CompletionListener<Req, Res, E> for Arc<L>
where
    L: CompletionListener<Req, Res, E> + Sync + ?Sized,
{
    fn on_success(&self, request: &Req, result: &Res) {
        (**self).on_success(request, result);
    }

    fn on_failure(&self, error: &TaskError<E>) {
        (**self).on_failure(error);
    }
}

/// Listener that ignores both callbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl<Req, Res, E> CompletionListener<Req, Res, E> for NoopListener {
    fn on_success(&self, _request: &Req, _result: &Res) {}

    fn on_failure(&self, _error: &TaskError<E>) {}
}

/// Listener built from a pair of closures
pub struct FnListener<S, F> {
    on_success: S,
    on_failure: F,
}

impl<S, F> FnListener<S, F> {
    pub fn new(on_success: S, on_failure: F) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }
}

impl<Req, Res, E, S, F> CompletionListener<Req, Res, E> for FnListener<S, F>
where
    S: Fn(&Req, &Res) + Send,
    F: Fn(&TaskError<E>) + Send,
{
    fn on_success(&self, request: &Req, result: &Res) {
        (self.on_success)(request, result);
    }

    fn on_failure(&self, error: &TaskError<E>) {
        (self.on_failure)(error);
    }
}
