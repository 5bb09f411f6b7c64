//! Error types for the sync engine.

use notemark_client::ApiError;
use thiserror::Error;

/// Result type for sync operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during a sync pass.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Remote API failure, after retries were exhausted.
    #[error("remote API error: {0}")]
    Api(#[from] ApiError),

    /// Local file or directory I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database schema has no title-typed property.
    ///
    /// Pages are named from their title; without one the pass cannot
    /// proceed.
    #[error("database {database_id} has no title property")]
    NoTitleProperty {
        /// The offending database id.
        database_id: String,
    },

    /// State document serialization failure.
    #[error("state serialization error: {0}")]
    State(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::NoTitleProperty {
            database_id: "db1".into(),
        };
        assert_eq!(err.to_string(), "database db1 has no title property");
    }

    #[test]
    fn api_errors_convert() {
        let err: EngineError = ApiError::MissingToken.into();
        assert!(matches!(err, EngineError::Api(ApiError::MissingToken)));
    }
}
