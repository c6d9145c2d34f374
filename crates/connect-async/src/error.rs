//! Error types surfaced by contact-center operations
//!
//! Every synchronous operation fails with a [`ConnectError`], which is one of two
//! shapes: a failure raised locally while making the call ([`ConnectError::Client`]),
//! or an error response returned by the service ([`ConnectError::Service`]).
//!
//! The async wrapper never inspects these; the helper methods exist for callers.
//!
//! # Example
//!
//! ```rust
//! use connect_async::{ConnectError, ServiceErrorKind};
//!
//! let err = ConnectError::service(ServiceErrorKind::ResourceNotFound, "Queue not found");
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! assert_eq!(err.status_code(), Some(404));
//! ```

use std::fmt;
use thiserror::Error;

/// Error returned by a contact-center operation
#[derive(Error, Debug)]
pub enum ConnectError {
    /// Error raised inside the client while making the request or handling
    /// the response, e.g. network unavailable or a serialization failure
    #[error("Client error: {message}")]
    Client {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error response returned by the service
    #[error("{kind} ({status_code}): {message}")]
    Service {
        kind: ServiceErrorKind,
        message: String,
        status_code: u16,
        request_id: Option<String>,
    },
}

/// Result type alias for contact-center operations
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Error codes the service can return
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    InvalidRequest,
    InvalidParameter,
    LimitExceeded,
    DuplicateResource,
    ResourceNotFound,
    UserNotFound,
    ContactNotFound,
    DestinationNotAllowed,
    OutboundContactNotPermitted,
    Throttling,
    InternalService,
    /// Any code this crate does not model
    Unknown(String),
}

impl ServiceErrorKind {
    /// Wire error code as sent by the service
    pub fn code(&self) -> &str {
        match self {
            ServiceErrorKind::InvalidRequest => "InvalidRequestException",
            ServiceErrorKind::InvalidParameter => "InvalidParameterException",
            ServiceErrorKind::LimitExceeded => "LimitExceededException",
            ServiceErrorKind::DuplicateResource => "DuplicateResourceException",
            ServiceErrorKind::ResourceNotFound => "ResourceNotFoundException",
            ServiceErrorKind::UserNotFound => "UserNotFoundException",
            ServiceErrorKind::ContactNotFound => "ContactNotFoundException",
            ServiceErrorKind::DestinationNotAllowed => "DestinationNotAllowedException",
            ServiceErrorKind::OutboundContactNotPermitted => {
                "OutboundContactNotPermittedException"
            }
            ServiceErrorKind::Throttling => "ThrottlingException",
            ServiceErrorKind::InternalService => "InternalServiceException",
            ServiceErrorKind::Unknown(code) => code.as_str(),
        }
    }

    /// Parse a wire error code
    pub fn from_code(code: &str) -> Self {
        match code {
            "InvalidRequestException" => ServiceErrorKind::InvalidRequest,
            "InvalidParameterException" => ServiceErrorKind::InvalidParameter,
            "LimitExceededException" => ServiceErrorKind::LimitExceeded,
            "DuplicateResourceException" => ServiceErrorKind::DuplicateResource,
            "ResourceNotFoundException" => ServiceErrorKind::ResourceNotFound,
            "UserNotFoundException" => ServiceErrorKind::UserNotFound,
            "ContactNotFoundException" => ServiceErrorKind::ContactNotFound,
            "DestinationNotAllowedException" => ServiceErrorKind::DestinationNotAllowed,
            "OutboundContactNotPermittedException" => {
                ServiceErrorKind::OutboundContactNotPermitted
            }
            "ThrottlingException" => ServiceErrorKind::Throttling,
            "InternalServiceException" => ServiceErrorKind::InternalService,
            other => ServiceErrorKind::Unknown(other.to_string()),
        }
    }

    /// HTTP status the service pairs with this code
    pub fn default_status(&self) -> u16 {
        match self {
            ServiceErrorKind::InvalidRequest | ServiceErrorKind::InvalidParameter => 400,
            ServiceErrorKind::DestinationNotAllowed
            | ServiceErrorKind::OutboundContactNotPermitted => 403,
            ServiceErrorKind::ResourceNotFound | ServiceErrorKind::UserNotFound => 404,
            ServiceErrorKind::DuplicateResource => 409,
            ServiceErrorKind::ContactNotFound => 410,
            ServiceErrorKind::LimitExceeded | ServiceErrorKind::Throttling => 429,
            ServiceErrorKind::InternalService => 500,
            ServiceErrorKind::Unknown(_) => 400,
        }
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl ConnectError {
    /// Build a service error with the kind's default status code
    pub fn service(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        let status_code = kind.default_status();
        ConnectError::Service {
            kind,
            message: message.into(),
            status_code,
            request_id: None,
        }
    }

    /// Build a client-side error
    pub fn client(message: impl Into<String>) -> Self {
        ConnectError::Client {
            message: message.into(),
            source: None,
        }
    }

    /// Build a client-side error with an underlying cause
    pub fn client_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectError::Client {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach the service request id to a service error
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        if let ConnectError::Service { request_id, .. } = &mut self {
            *request_id = Some(id.into());
        }
        self
    }

    /// The service error kind, if this came from the service
    pub fn kind(&self) -> Option<&ServiceErrorKind> {
        match self {
            ConnectError::Service { kind, .. } => Some(kind),
            ConnectError::Client { .. } => None,
        }
    }

    /// HTTP status of a service error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConnectError::Service { status_code, .. } => Some(*status_code),
            ConnectError::Client { .. } => None,
        }
    }

    /// Service request id, when the service reported one
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ConnectError::Service { request_id, .. } => request_id.as_deref(),
            ConnectError::Client { .. } => None,
        }
    }

    /// Returns true if this error was raised locally rather than by the service
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, ConnectError::Client { .. })
    }

    /// Returns true if the referenced resource, user or contact does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            Some(
                ServiceErrorKind::ResourceNotFound
                    | ServiceErrorKind::UserNotFound
                    | ServiceErrorKind::ContactNotFound
            )
        )
    }

    /// Returns true if the request itself was rejected as malformed
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self.kind(),
            Some(ServiceErrorKind::InvalidRequest | ServiceErrorKind::InvalidParameter)
        )
    }

    /// Returns true if this is a duplicate resource error (409)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind(), Some(ServiceErrorKind::DuplicateResource))
    }

    /// Returns true if the call was throttled or hit a service limit
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        matches!(
            self.kind(),
            Some(ServiceErrorKind::Throttling | ServiceErrorKind::LimitExceeded)
        )
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_some_and(|s| s >= 500)
    }

    /// Returns true if this error is potentially retryable
    ///
    /// Informational only: nothing in this crate retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ConnectError::Client { .. } => true,
            ConnectError::Service { kind, .. } => matches!(
                kind,
                ServiceErrorKind::Throttling | ServiceErrorKind::InternalService
            ),
        }
    }
}
