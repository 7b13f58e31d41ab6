//! Error types for the order cache service
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and the service around it.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Record not found in the cache nor in the durable store
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Snapshot dump requested but no snapshot path is configured
    #[error("Snapshot path is not configured")]
    SnapshotNotConfigured,

    /// Snapshot file could not be created or written
    #[error("Snapshot I/O failed for {}: {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot contents could not be encoded
    #[error("Snapshot encoding failed: {0}")]
    SnapshotEncode(#[from] serde_json::Error),

    /// Durable store failure
    #[error("Repository error: {0}")]
    Repository(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Config(_)
            | CacheError::SnapshotNotConfigured
            | CacheError::SnapshotIo { .. }
            | CacheError::SnapshotEncode(_)
            | CacheError::Repository(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::NotFound("o1".to_string()), StatusCode::NOT_FOUND),
            (
                CacheError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CacheError::Repository("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CacheError::SnapshotNotConfigured,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_snapshot_io_message_names_path() {
        let err = CacheError::SnapshotIo {
            path: PathBuf::from("/tmp/dump.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/dump.json"));
        assert!(msg.contains("denied"));
    }
}
