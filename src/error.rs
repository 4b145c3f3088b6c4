// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::store::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every failure the API can surface maps to exactly one of these four
/// variants; nothing reaches the caller unformatted.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request (malformed or missing input, or referenced drink absent)
    BadRequest(String),

    // 401 Unauthorized (missing/invalid/insufficient credential)
    Unauthorized(String),

    // 404 Not Found (unknown route)
    NotFound(String),

    // 422 Unprocessable Entity (store-level constraint violation)
    Unprocessable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Unprocessable(_) => 422,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Unprocessable(msg) => msg,
        }
    }

    /// Convert to the JSON error envelope
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status_code(),
            "message": self.message(),
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        ApiError::Unprocessable(message.into())
    }
}

// Convert store errors to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::bad_request(msg),
            StoreError::ConstraintViolation(msg) => {
                tracing::warn!("Store constraint violation: {}", msg);
                ApiError::unprocessable("unprocessable")
            }
            StoreError::InvalidRecipe(e) => {
                // Don't expose the serialized text to clients
                tracing::error!("Corrupt recipe column: {}", e);
                ApiError::unprocessable("unprocessable")
            }
            StoreError::Sqlx(e) => {
                tracing::error!("SQLx error: {}", e);
                ApiError::unprocessable("unprocessable")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
