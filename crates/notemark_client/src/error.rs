//! Error types for remote API calls.

use std::time::Duration;
use thiserror::Error;

/// Result type for remote API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur talking to the remote API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The auth token is missing from the environment.
    #[error("NOTION_TOKEN is not set")]
    MissingToken,

    /// Network-level failure before a status was received. Retryable.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The remote returned a non-success status.
    #[error("remote returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
        /// Server-specified retry delay, when present.
        retry_after: Option<Duration>,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a status error with no retry hint.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Returns true if the operation can be retried.
    ///
    /// Network failures, 429, and 5xx are retryable; every other remote
    /// failure is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport { .. } => true,
            ApiError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// Returns the server-specified retry delay, when present.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport {
            message: err.to_string(),
        }
    }
}
