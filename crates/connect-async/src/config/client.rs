//! Connection settings handed through to the synchronous client
//!
//! Only `max_connections` is read by this crate (to size the worker pool); the
//! remaining fields are carried untouched to whatever builds the synchronous
//! provider.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Maximum concurrent connections; also the async worker pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Time allowed to establish a connection, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// Time allowed for data on an open connection, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub socket_timeout_ms: u64,

    /// Retry budget for the synchronous client's own use
    #[serde(default = "default_max_error_retry")]
    pub max_error_retry: u32,

    /// Extra user agent suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connection_timeout_ms: default_timeout_ms(),
            socket_timeout_ms: default_timeout_ms(),
            max_error_retry: default_max_error_retry(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }
}

// Default value functions for serde
fn default_max_connections() -> usize {
    crate::task::DEFAULT_POOL_SIZE
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_max_error_retry() -> u32 {
    3
}
