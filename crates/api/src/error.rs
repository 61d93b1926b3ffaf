//! Api-level error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use engine::ValidationResult;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A strict simulation was requested for a graph that does not validate.
    #[error("workflow failed validation with {} error(s)", .0.errors.len())]
    Rejected(ValidationResult),

    /// Binding or serving the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(result) => (StatusCode::UNPROCESSABLE_ENTITY, Json(result)).into_response(),
            ApiError::Io(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
        }
    }
}
