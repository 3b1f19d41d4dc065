//! Error types for the cache strategy service
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
/// Unified error type for the cache manager and the HTTP layer.
///
/// The strategy layer never hands these to its callers; it logs them and
/// degrades to a miss or a dropped write.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in a tier
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Tier is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Backing tier cannot be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Value could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::Expired(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::CacheFull(_) | CacheError::Unavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layers.
pub type Result<T> = std::result::Result<T, CacheError>;
