//! Bounded worker pool for blocking operations
//!
//! Each submission spawns a small supervisor on the tokio runtime. The
//! supervisor waits for one of the pool's permits and hands the call to
//! tokio's blocking threads. The worker runs the call, notifies the listener
//! while still holding the permit, and only then reports back; the supervisor
//! publishes the outcome to the [`TaskHandle`]. Failures decided by the
//! supervisor (rejection, cancellation, termination) are reported to the
//! listener on a blocking thread too, so a slow listener never occupies the
//! runtime. The permit travels with the blocking call, so at most `size` calls
//! execute at any instant even when a handle gives up on its call early.

use super::error::{PoolError, TaskError};
use super::handle::{Outcome, TaskHandle, lost_worker};
use super::listener::{CompletionListener, NoopListener};
use super::state::{SharedState, TaskId, TaskState};
use crate::config::ClientConfig;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, oneshot, watch};
use tokio::task::JoinError;
use tracing::{debug, info, trace, warn};

/// Pool size used when none is configured
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Fixed-size pool executing blocking operations off the caller's thread
///
/// Cloning is cheap and yields another handle to the same pool.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    runtime: Handle,
    permits: Arc<Semaphore>,
    size: usize,
    shutdown: watch::Sender<bool>,
    next_id: AtomicU64,
    in_flight: AtomicUsize,
    running: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Create a pool of `size` workers on the current tokio runtime
    pub fn new(size: usize) -> Result<Self, PoolError> {
        let runtime = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;
        Self::with_runtime(runtime, size)
    }

    /// Create a pool of `size` workers on the given runtime
    ///
    /// Useful when the pool is built outside of any runtime context.
    pub fn with_runtime(runtime: Handle, size: usize) -> Result<Self, PoolError> {
        if size == 0 || size > Semaphore::MAX_PERMITS {
            return Err(PoolError::InvalidSize(size));
        }

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            inner: Arc::new(PoolInner {
                runtime,
                permits: Arc::new(Semaphore::new(size)),
                size,
                shutdown,
                next_id: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                running: Arc::new(AtomicUsize::new(0)),
            }),
        })
    }

    /// Create a pool sized from the client configuration's connection limit
    pub fn from_config(config: &ClientConfig) -> Result<Self, PoolError> {
        Self::new(config.max_connections)
    }

    /// Maximum number of operations executing at once
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Tasks submitted but not yet terminal
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Blocking calls currently executing
    pub fn running(&self) -> usize {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called
    pub fn is_shutdown(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    /// Submit `call(&request)` and return a handle to its outcome
    ///
    /// Never blocks. `operation` names the call in logs and on the handle.
    pub fn submit<Req, Res, E, F>(
        &self,
        operation: &'static str,
        request: Req,
        call: F,
    ) -> TaskHandle<Res, E>
    where
        Req: Send + 'static,
        Res: Send + 'static,
        E: Send + 'static,
        F: FnOnce(&Req) -> Result<Res, E> + Send + 'static,
    {
        self.spawn_task(operation, request, call, None::<NoopListener>)
    }

    /// Submit `call(&request)`, notifying `listener` before the handle resolves
    ///
    /// Exactly one listener callback runs for every outcome: success,
    /// operation failure, cancellation, rejection or termination. It runs on
    /// a blocking worker thread, never on the runtime, so the listener may
    /// block, including on another task's [`TaskHandle::wait`]. If the runtime
    /// itself goes away before the task reports, the listener hears the same
    /// [`TaskError::Panicked`] the handle yields.
    pub fn submit_with_listener<Req, Res, E, F, L>(
        &self,
        operation: &'static str,
        request: Req,
        call: F,
        listener: L,
    ) -> TaskHandle<Res, E>
    where
        Req: Send + 'static,
        Res: Send + 'static,
        E: Send + 'static,
        F: FnOnce(&Req) -> Result<Res, E> + Send + 'static,
        L: CompletionListener<Req, Res, E> + 'static,
    {
        self.spawn_task(operation, request, call, Some(listener))
    }

    /// Stop accepting work and abandon everything in flight
    ///
    /// Queued tasks fail with [`TaskError::Rejected`] and never run. Running
    /// tasks resolve to [`TaskError::Terminated`] without waiting for their
    /// blocking call, unless the call already returned and its listener is
    /// being notified; that task keeps its own outcome. Callers that want a
    /// graceful drain should await their handles before calling this. Calling
    /// it again has no effect.
    pub fn shutdown(&self) {
        let was_shutdown = self.inner.shutdown.send_replace(true);
        if was_shutdown {
            return;
        }
        self.inner.permits.close();
        info!(
            in_flight = self.in_flight(),
            running = self.running(),
            "Worker pool shut down"
        );
    }

    fn spawn_task<Req, Res, E, F, L>(
        &self,
        operation: &'static str,
        request: Req,
        call: F,
        listener: Option<L>,
    ) -> TaskHandle<Res, E>
    where
        Req: Send + 'static,
        Res: Send + 'static,
        E: Send + 'static,
        F: FnOnce(&Req) -> Result<Res, E> + Send + 'static,
        L: CompletionListener<Req, Res, E> + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let state = SharedState::new();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        debug!(task_id = id, operation, "Task submitted");

        let inner = Arc::clone(&self.inner);
        let task_state = state.clone();
        let slot = ListenerSlot::new(listener);
        self.inner.runtime.spawn(async move {
            let mut report: Report<Req, Res, E, L> =
                Report::new(id, operation, slot.clone(), outcome_tx);
            let _in_flight = InFlight(Arc::clone(&inner));
            let started = Instant::now();

            let task: Task<Req, Res, E, L> = Task::new(id, operation, slot);
            let outcome = task
                .execute(&inner, &task_state, cancel_rx, request, call)
                .await;

            let terminal = match &outcome {
                Ok(_) => TaskState::Succeeded,
                Err(TaskError::Cancelled) => TaskState::Cancelled,
                Err(_) => TaskState::Failed,
            };
            task_state.advance(terminal);
            debug!(
                task_id = id,
                operation,
                state = %terminal,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Task finished"
            );

            report.send(outcome);
        });

        TaskHandle::new(id, operation, state, cancel_tx, outcome_rx)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size())
            .field("in_flight", &self.in_flight())
            .field("running", &self.running())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

/// One submission as seen by its supervisor
struct Task<Req, Res, E, L> {
    id: TaskId,
    operation: &'static str,
    slot: ListenerSlot<L>,
    _types: PhantomData<fn(&Req, &Res, E)>,
}

impl<Req, Res, E, L> Task<Req, Res, E, L>
where
    Req: Send + 'static,
    Res: Send + 'static,
    E: Send + 'static,
    L: CompletionListener<Req, Res, E> + 'static,
{
    fn new(id: TaskId, operation: &'static str, slot: ListenerSlot<L>) -> Self {
        Self {
            id,
            operation,
            slot,
            _types: PhantomData,
        }
    }

    /// Run the task to an outcome the listener has already been told about
    async fn execute<F>(
        &self,
        inner: &PoolInner,
        state: &SharedState,
        mut cancel: watch::Receiver<bool>,
        request: Req,
        call: F,
    ) -> Outcome<Res, E>
    where
        F: FnOnce(&Req) -> Result<Res, E> + Send + 'static,
    {
        let (id, operation) = (self.id, self.operation);
        let mut shutdown = inner.shutdown.subscribe();
        if *shutdown.borrow_and_update() {
            return Err(self.fail(TaskError::Rejected).await);
        }

        let permit = tokio::select! {
            biased;
            _ = signalled(&mut cancel) => return Err(self.fail(TaskError::Cancelled).await),
            acquired = Arc::clone(&inner.permits).acquire_owned() => match acquired {
                Ok(permit) => permit,
                // closed by shutdown while queued
                Err(_) => return Err(self.fail(TaskError::Rejected).await),
            },
        };
        if *shutdown.borrow_and_update() {
            return Err(self.fail(TaskError::Rejected).await);
        }
        if *cancel.borrow_and_update() {
            return Err(self.fail(TaskError::Cancelled).await);
        }

        state.advance(TaskState::Running);
        trace!(task_id = id, operation, "Task running");

        let running = Running::enter(&inner.running);
        let slot = self.slot.clone();
        let mut blocking = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let _running = running;
            let outcome = call(&request).map_err(TaskError::Operation);
            if let Claim::Won(listener) = slot.claim() {
                guarded(id, operation, || match &outcome {
                    Ok(response) => listener.on_success(&request, response),
                    Err(error) => listener.on_failure(error),
                });
            }
            outcome
        });

        let interrupted = tokio::select! {
            biased;
            joined = &mut blocking => return match joined {
                Ok(outcome) => outcome,
                Err(join_error) => Err(self.fail(panicked(id, operation, join_error)).await),
            },
            _ = signalled(&mut shutdown) => TaskError::Terminated,
            _ = signalled(&mut cancel) => TaskError::Cancelled,
        };

        match self.slot.claim() {
            Claim::Lost => {
                // The worker finished the call and is notifying the listener
                trace!(task_id = id, operation, "Keeping outcome already reported to listener");
                match blocking.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => Err(panicked(id, operation, join_error)),
                }
            }
            claim => {
                if matches!(interrupted, TaskError::Terminated) {
                    warn!(task_id = id, operation, "Running task terminated by pool shutdown");
                }
                match claim {
                    Claim::Won(listener) => Err(self.notify_failure(listener, interrupted).await),
                    _ => Err(interrupted),
                }
            }
        }
    }

    /// Report a failure decided here, unless the worker already reported
    async fn fail(&self, error: TaskError<E>) -> TaskError<E> {
        match self.slot.claim() {
            Claim::Won(listener) => self.notify_failure(listener, error).await,
            Claim::Nobody | Claim::Lost => error,
        }
    }

    async fn notify_failure(&self, listener: L, error: TaskError<E>) -> TaskError<E> {
        let (id, operation) = (self.id, self.operation);
        let notified = tokio::task::spawn_blocking(move || {
            guarded(id, operation, || listener.on_failure(&error));
            error
        });
        match notified.await {
            Ok(error) => error,
            Err(join_error) => panicked(id, operation, join_error),
        }
    }
}

/// Hands the listener to whichever side reports the outcome first
struct ListenerSlot<L> {
    listener: Option<Arc<Mutex<Option<L>>>>,
}

enum Claim<L> {
    /// No listener was attached
    Nobody,
    Won(L),
    /// Someone else already took the listener
    Lost,
}

impl<L> ListenerSlot<L> {
    fn new(listener: Option<L>) -> Self {
        Self {
            listener: listener.map(|l| Arc::new(Mutex::new(Some(l)))),
        }
    }

    fn claim(&self) -> Claim<L> {
        let Some(slot) = &self.listener else {
            return Claim::Nobody;
        };
        match slot.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(listener) => Claim::Won(listener),
            None => Claim::Lost,
        }
    }
}

impl<L> Clone for ListenerSlot<L> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
        }
    }
}

/// Delivers the outcome to the handle
///
/// Dropped without sending, as when the runtime shuts down under a queued
/// task, it still tells an unnotified listener about the lost worker.
struct Report<Req, Res, E, L>
where
    L: CompletionListener<Req, Res, E>,
{
    id: TaskId,
    operation: &'static str,
    slot: ListenerSlot<L>,
    outcome: Option<oneshot::Sender<Outcome<Res, E>>>,
    _request: PhantomData<fn(&Req)>,
}

impl<Req, Res, E, L> Report<Req, Res, E, L>
where
    L: CompletionListener<Req, Res, E>,
{
    fn new(
        id: TaskId,
        operation: &'static str,
        slot: ListenerSlot<L>,
        outcome: oneshot::Sender<Outcome<Res, E>>,
    ) -> Self {
        Self {
            id,
            operation,
            slot,
            outcome: Some(outcome),
            _request: PhantomData,
        }
    }

    fn send(&mut self, outcome: Outcome<Res, E>) {
        if let Some(sender) = self.outcome.take() {
            // The caller may have dropped the handle; the outcome is then discarded
            let _ = sender.send(outcome);
        }
    }
}

impl<Req, Res, E, L> Drop for Report<Req, Res, E, L>
where
    L: CompletionListener<Req, Res, E>,
{
    fn drop(&mut self) {
        if self.outcome.is_none() {
            return;
        }
        if let Claim::Won(listener) = self.slot.claim() {
            debug!(task_id = self.id, operation = self.operation, "Worker lost before reporting");
            guarded(self.id, self.operation, || listener.on_failure(&lost_worker()));
        }
    }
}

fn guarded(id: TaskId, operation: &'static str, notify: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(notify)).is_err() {
        warn!(task_id = id, operation, "Completion listener panicked");
    }
}

/// Resolves once the flag is raised; never resolves if its sender is gone
async fn signalled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|raised| *raised).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn panicked<E>(id: TaskId, operation: &'static str, error: JoinError) -> TaskError<E> {
    let message = panic_message(error);
    warn!(task_id = id, operation, panic = %message, "Operation panicked");
    TaskError::Panicked(message)
}

fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return "blocking task was cancelled by the runtime".to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

struct InFlight(Arc<PoolInner>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

struct Running(Arc<AtomicUsize>);

impl Running {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(counter))
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::FnListener;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc;
    use std::time::Duration;

    struct PanickingListener;

    impl CompletionListener<(), &'static str, String> for PanickingListener {
        fn on_success(&self, _request: &(), _result: &&'static str) {
            panic!("listener bug");
        }

        fn on_failure(&self, _error: &TaskError<String>) {}
    }

    #[test]
    fn test_new_requires_runtime() {
        assert_eq!(WorkerPool::new(4).unwrap_err(), PoolError::NoRuntime);
    }

    #[tokio::test]
    async fn test_zero_size_rejected() {
        assert_eq!(WorkerPool::new(0).unwrap_err(), PoolError::InvalidSize(0));
    }

    #[test]
    fn test_with_runtime_outside_context() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .unwrap();
        let pool = WorkerPool::with_runtime(runtime.handle().clone(), 2).unwrap();

        let handle = pool.submit("double", 21_u32, |n: &u32| Ok::<_, String>(n * 2));
        assert_eq!(handle.wait().unwrap(), 42);
    }

    #[tokio::test]
    async fn test_submit_resolves_to_result() {
        let pool = WorkerPool::new(2).unwrap();
        let handle = pool.submit("echo", "hello".to_string(), |s: &String| {
            Ok::<_, String>(s.to_uppercase())
        });

        assert_eq!(handle.operation(), "echo");
        assert_eq!(handle.await.unwrap(), "HELLO");
    }

    #[tokio::test]
    async fn test_operation_error_passes_through() {
        let pool = WorkerPool::new(2).unwrap();
        let handle = pool.submit("fail", (), |_: &()| Err::<(), _>("not found".to_string()));

        let err = handle.await.unwrap_err();
        assert_eq!(err.into_operation_error(), Some("not found".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_submit_does_not_block_caller() {
        let pool = WorkerPool::new(1).unwrap();
        let (release, latch) = mpsc::channel::<()>();

        let mut handle = pool.submit("blocked", (), move |_: &()| {
            latch.recv_timeout(Duration::from_secs(5)).ok();
            Ok::<_, String>(7)
        });

        // Submission returned while the call is still parked on the latch
        assert!(handle.try_result().is_none());
        assert!(!handle.is_done());

        release.send(()).unwrap();
        assert_eq!(handle.await.unwrap(), 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_listener_runs_before_handle_resolves() {
        let pool = WorkerPool::new(2).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&events);
        let failed = Arc::clone(&events);
        let handle = pool.submit_with_listener(
            "slow_listener",
            5_u32,
            |n: &u32| Ok::<_, String>(n + 1),
            FnListener::new(
                move |req: &u32, res: &u32| {
                    std::thread::sleep(Duration::from_millis(50));
                    seen.lock().unwrap().push(format!("success {req} -> {res}"));
                },
                move |err: &TaskError<String>| {
                    failed.lock().unwrap().push(format!("failure {err}"));
                },
            ),
        );

        assert_eq!(handle.await.unwrap(), 6);
        assert_eq!(*events.lock().unwrap(), vec!["success 5 -> 6".to_string()]);
    }

    #[tokio::test]
    async fn test_slow_listener_does_not_stall_caller() {
        let pool = WorkerPool::new(1).unwrap();
        let started = Arc::new(AtomicBool::new(false));
        let listener_thread = Arc::new(Mutex::new(None));

        let flag = Arc::clone(&started);
        let thread = Arc::clone(&listener_thread);
        let handle = pool.submit_with_listener(
            "slow_listener",
            (),
            |_: &()| Ok::<_, String>(1),
            FnListener::new(
                move |_: &(), _: &i32| {
                    *thread.lock().unwrap() = Some(std::thread::current().id());
                    flag.store(true, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(400));
                },
                |_: &TaskError<String>| {},
            ),
        );

        while !started.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        // The listener is asleep; the caller's own timers must still fire on time
        let caller_work = Instant::now();
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(
            caller_work.elapsed() < Duration::from_millis(300),
            "caller stalled for {:?}",
            caller_work.elapsed()
        );
        assert!(!handle.is_done());

        assert_eq!(handle.await.unwrap(), 1);
        let listener_thread = listener_thread.lock().unwrap().unwrap();
        assert_ne!(listener_thread, std::thread::current().id());
    }

    /// Blocks on another task's handle from inside its callback
    struct WaitsForOther {
        other: Mutex<Option<TaskHandle<u32, String>>>,
        seen: Arc<Mutex<Option<Result<u32, String>>>>,
    }

    impl CompletionListener<(), (), String> for WaitsForOther {
        fn on_success(&self, _request: &(), _result: &()) {
            let Some(other) = self.other.lock().unwrap().take() else {
                return;
            };
            let result = other.wait().map_err(|err| err.to_string());
            *self.seen.lock().unwrap() = Some(result);
        }

        fn on_failure(&self, _error: &TaskError<String>) {}
    }

    #[tokio::test]
    async fn test_listener_can_wait_on_another_handle() {
        let pool = WorkerPool::new(2).unwrap();
        let seen = Arc::new(Mutex::new(None));

        let other = pool.submit("other", 5_u32, |n: &u32| {
            std::thread::sleep(Duration::from_millis(20));
            Ok::<_, String>(n * 3)
        });
        let handle = pool.submit_with_listener(
            "waiter",
            (),
            |_: &()| Ok::<_, String>(()),
            WaitsForOther {
                other: Mutex::new(Some(other)),
                seen: Arc::clone(&seen),
            },
        );

        handle.await.unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(Ok(15)));
    }

    #[test]
    fn test_runtime_shutdown_notifies_queued_listener() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let pool = WorkerPool::with_runtime(runtime.handle().clone(), 1).unwrap();
        let failures = Arc::new(Mutex::new(Vec::new()));

        let succeeded = Arc::clone(&failures);
        let seen = Arc::clone(&failures);
        let handle = pool.submit_with_listener(
            "never_driven",
            (),
            |_: &()| Ok::<_, String>(()),
            FnListener::new(
                move |_: &(), _: &()| succeeded.lock().unwrap().push("success".to_string()),
                move |err: &TaskError<String>| seen.lock().unwrap().push(err.to_string()),
            ),
        );

        // Nothing ever drove the runtime, so the supervisor is dropped unfinished
        drop(runtime);

        assert!(matches!(handle.wait(), Err(TaskError::Panicked(_))));
        let failures = failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("without reporting"), "got {failures:?}");
    }

    #[tokio::test]
    async fn test_listener_panic_does_not_lose_outcome() {
        let pool = WorkerPool::new(1).unwrap();
        let handle = pool.submit_with_listener(
            "panicky_listener",
            (),
            |_: &()| Ok::<_, String>("done"),
            PanickingListener,
        );

        assert_eq!(handle.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_panicking_operation_reported() {
        let pool = WorkerPool::new(1).unwrap();
        let handle = pool.submit("explode", (), |_: &()| -> Result<(), String> {
            panic!("kaboom")
        });

        match handle.await {
            Err(TaskError::Panicked(message)) => assert!(message.contains("kaboom")),
            other => panic!("expected panic error, got {other:?}"),
        }
        assert_eq!(pool.running(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_queued_task_never_runs() {
        let pool = WorkerPool::new(1).unwrap();
        let (release, latch) = mpsc::channel::<()>();
        let ran = Arc::new(AtomicUsize::new(0));

        let blocker = pool.submit("blocker", (), move |_: &()| {
            latch.recv_timeout(Duration::from_secs(5)).ok();
            Ok::<_, String>(())
        });
        while blocker.state() != TaskState::Running {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let counter = Arc::clone(&ran);
        let queued = pool.submit("queued", (), move |_: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(())
        });

        assert!(queued.cancel());
        assert!(queued.await.unwrap_err().is_cancelled());

        release.send(()).unwrap();
        blocker.await.unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_after_completion_returns_false() {
        let pool = WorkerPool::new(1).unwrap();
        let mut handle = pool.submit("quick", (), |_: &()| Ok::<_, String>(1));

        while !handle.is_done() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!handle.cancel());
        assert_eq!(handle.state(), TaskState::Succeeded);
        assert_eq!(handle.try_result().unwrap().unwrap(), 1);
        assert!(handle.try_result().is_none());
    }

    #[tokio::test]
    async fn test_task_ids_are_unique() {
        let pool = WorkerPool::new(2).unwrap();
        let a = pool.submit("a", (), |_: &()| Ok::<_, String>(()));
        let b = pool.submit("b", (), |_: &()| Ok::<_, String>(()));

        assert_ne!(a.id(), b.id());
        a.await.unwrap();
        b.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let pool = WorkerPool::new(2).unwrap();
        assert!(!pool.is_shutdown());

        pool.shutdown();
        pool.shutdown();
        assert!(pool.is_shutdown());

        let handle = pool.submit("late", (), |_: &()| Ok::<_, String>(()));
        assert!(matches!(handle.await, Err(TaskError::Rejected)));
    }
}
