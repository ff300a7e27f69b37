// Maps domain errors onto HTTP responses.

use crate::core::listings::ListingError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Missing or invalid admin session")]
    Unauthorized,
}

// Malformed bodies are caller errors like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Listing(ListingError::Validation(_)) | ApiError::InvalidBody(_) => {
                (StatusCode::BAD_REQUEST, "validation")
            }
            ApiError::Listing(ListingError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Listing(ListingError::Duplicate) => (StatusCode::CONFLICT, "duplicate"),
            ApiError::Listing(ListingError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage")
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        // Storage details stay in the logs, not in the response
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Something went wrong, try again later".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}
