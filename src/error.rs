//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache service.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Request failed validation (empty key, empty value, empty group, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request could not be parsed from the wire
    #[error("Parse error: {0}")]
    Parse(String),

    /// Durable-store engine error; the enclosing transaction was rolled back
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        CacheError::Internal(format!("storage task failed: {err}"))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_display() {
        let err = CacheError::InvalidRequest("Key cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid request: Key cannot be empty");
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let err: CacheError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, CacheError::Sqlite(_)));
        assert!(err.to_string().starts_with("Storage error:"));
    }
}
