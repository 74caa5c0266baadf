//! Custom error types for the client SDK

use thiserror::Error;

/// Custom error type for client operations
///
/// Validation errors are detected locally before any network call is
/// made; everything else classifies a backend response or a transport
/// failure.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Input rejected locally, no request was sent
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired token, or bad credentials
    #[error("{0}")]
    Auth(String),

    /// Authenticated but not authorized for the resource
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Transport-level failure (timeout, DNS, connection refused)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-specific failure response from the server
    #[error("Server error: {0}")]
    Server(String),

    /// Local key-value store failure
    #[error("Storage error: {0}")]
    Storage(#[from] common::error::StoreError),
}

impl ApiError {
    /// True when the error means the session is no longer usable and the
    /// user must log in again
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}

/// Type alias for client results
pub type ApiResult<T> = Result<T, ApiError>;
