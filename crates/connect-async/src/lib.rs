//! # connect-async
//!
//! Asynchronous facade over a synchronous contact-center management client.
//!
//! Every operation of the synchronous [`ConnectApi`] is exposed on
//! [`ConnectAsyncClient`] twice: `<op>_async(request)` returns a [`TaskHandle`]
//! at once while the blocking call runs on a bounded [`WorkerPool`], and
//! `<op>_async_with_listener(request, listener)` additionally tells a
//! [`CompletionListener`] about the outcome before the handle resolves.
//!
//! ## Modules
//!
//! - [`api`] - the synchronous provider trait
//! - [`client`] - the async facade
//! - [`task`] - worker pool, task handles and listeners
//! - [`model`] - request and result types for every operation
//! - [`memory`] - process-local provider
//! - [`config`] - profiles, client settings and credentials
//! - [`error`] - operation errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use connect_async::{ConnectAsyncClient, InMemoryConnect};
//! use connect_async::model::DeleteQueueRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ConnectAsyncClient::new(InMemoryConnect::with_instance("inst-1"))?;
//!
//! let handle = client.delete_queue_async(DeleteQueueRequest::new("inst-1", "missing"));
//! match handle.await {
//!     Ok(()) => println!("deleted"),
//!     Err(err) => println!("delete failed: {err}"),
//! }
//!
//! client.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod task;

pub use api::ConnectApi;
pub use client::ConnectAsyncClient;
pub use config::{ClientConfig, ClientSettings, Config, ConfigError, Profile};
pub use error::{ConnectError, Result, ServiceErrorKind};
pub use memory::InMemoryConnect;
pub use task::{
    CompletionListener, FnListener, NoopListener, PoolError, TaskError, TaskHandle, TaskId,
    TaskState, WorkerPool,
};
