//! Worker-pool execution of blocking operations
//!
//! Turns a blocking call `op(&Request) -> Result<Response, E>` into a
//! non-blocking submission that returns a [`TaskHandle`] immediately. The call
//! runs on a bounded pool; an optional [`CompletionListener`] hears about the
//! outcome before the handle does.
//!
//! ```rust,ignore
//! let pool = WorkerPool::new(10)?;
//!
//! // Future only
//! let handle = pool.submit("describe_user", request, move |r| api.describe_user(r));
//! let user = handle.await?;
//!
//! // Future plus listener
//! let handle = pool.submit_with_listener(
//!     "delete_queue",
//!     request,
//!     move |r| api.delete_queue(r),
//!     FnListener::new(
//!         |_req, _res| println!("deleted"),
//!         |err| eprintln!("delete failed: {err}"),
//!     ),
//! );
//! ```

pub mod error;
pub mod handle;
pub mod listener;
pub mod pool;
pub mod state;

pub use error::{PoolError, TaskError};
pub use handle::TaskHandle;
pub use listener::{CompletionListener, FnListener, NoopListener};
pub use pool::{DEFAULT_POOL_SIZE, WorkerPool};
pub use state::{TaskId, TaskState};
