//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache server.
///
/// Unknown owners, unknown keys and expired entries all surface as
/// `NotFound`, so callers cannot tell them apart.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Owner or key unknown, or entry expired
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Fetching the body from an external URL failed
    #[error("Unable to get data from external URL: {0}")]
    Fetch(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::Fetch(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
