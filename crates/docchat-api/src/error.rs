//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docchat_core::DocChatError;
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced by API handlers
#[derive(Debug)]
pub enum AppError {
    /// Client-side problem, reported as 400
    BadRequest(String),
    /// Server-side failure, reported as 500
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<DocChatError> for AppError {
    fn from(err: DocChatError) -> Self {
        match err {
            DocChatError::ValidationError(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}
