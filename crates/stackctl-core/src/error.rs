//! Error taxonomy for status probes and waits
//!
//! Two layers of errors live here:
//!
//! - [`ApiError`] is what a status client returns when a single read against
//!   the provider fails. It carries the HTTP status when there was one, so wait
//!   handlers can tell "the resource is gone" apart from "the provider failed".
//! - [`WaitError`] is why a wait ended without success: the probe failed, the
//!   resource reported a failure state, the deadline passed, or the caller
//!   cancelled. [`WaitFailure`] pairs it with the last snapshot, if any.
//!
//! # Example
//!
//! ```rust
//! use stackctl_core::{ApiError, WaitError};
//!
//! let err = ApiError::Status { status: 404, message: "cluster not found".to_string() };
//! assert!(err.is_not_found());
//!
//! let wait_err: WaitError = err.into();
//! assert!(wait_err.is_api());
//! assert_eq!(wait_err.status_code(), Some(404));
//! ```

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error returned by a status client for one read against the provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The provider answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No response was received (connection refused, TLS failure, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Result type alias for status client calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// The HTTP status code, when the provider answered at all
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Returns true if this is a "forbidden" error (403)
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(500..=599))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Why a wait ended without reaching its success state
#[derive(Error, Debug)]
pub enum WaitError {
    /// The status probe itself failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The resource reported a state it cannot recover from
    #[error("{0}")]
    Failed(String),

    /// No terminal state was observed before the deadline
    #[error("Wait timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the wait
    #[error("Wait was cancelled")]
    Cancelled,
}

impl WaitError {
    /// Returns true if the status probe failed
    #[must_use]
    pub fn is_api(&self) -> bool {
        matches!(self, WaitError::Api(_))
    }

    /// Returns true if the resource reported a failure state
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, WaitError::Failed(_))
    }

    /// Returns true if the deadline elapsed
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout(_))
    }

    /// Returns true if the caller cancelled the wait
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitError::Cancelled)
    }

    /// The underlying probe error, if the probe failed
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            WaitError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the probe error, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().and_then(ApiError::status_code)
    }
}

/// A terminal wait error together with the last snapshot the handler chose to keep
///
/// Only domain failures carry a snapshot (e.g. the cluster that entered
/// `STATE_FAILED`). Probe errors, timeouts and cancellations never do.
#[derive(Debug)]
pub struct WaitFailure<T> {
    error: WaitError,
    snapshot: Option<T>,
}

impl<T> WaitFailure<T> {
    pub fn new(error: WaitError, snapshot: Option<T>) -> Self {
        Self { error, snapshot }
    }

    pub fn error(&self) -> &WaitError {
        &self.error
    }

    pub fn snapshot(&self) -> Option<&T> {
        self.snapshot.as_ref()
    }

    pub fn into_parts(self) -> (Option<T>, WaitError) {
        (self.snapshot, self.error)
    }
}

impl<T> From<WaitError> for WaitFailure<T> {
    fn from(error: WaitError) -> Self {
        Self::new(error, None)
    }
}

impl<T> From<WaitFailure<T>> for WaitError {
    fn from(failure: WaitFailure<T>) -> Self {
        failure.error
    }
}

impl<T> fmt::Display for WaitFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> std::error::Error for WaitFailure<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

/// Result of waiting on an asynchronous operation
pub type WaitResult<T> = std::result::Result<T, WaitFailure<T>>;
