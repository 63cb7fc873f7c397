use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::chat::ChatError;

/// Message shown for any failure the caller cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Structured API error that serializes to `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    PayloadTooLarge,
    InternalError(String),
}

/// Message returned when a request body exceeds the router's body limit.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            ),
            ApiError::InternalError(detail) => {
                tracing::error!(error = %detail, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
