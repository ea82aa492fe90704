//! Error types for roster-api
//!
//! Every failure renders as `{"error": {"code", "message"}, "notice"?}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_common::api::{ErrorResponse, Notice};
use thiserror::Error;

use crate::services::{BackendError, SubmissionError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Data backend read failed (502)
    #[error("Data backend error: {0}")]
    Backend(#[from] BackendError),

    /// Submission rejected or failed before anything was persisted
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<Notice>) {
        match self {
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                Some(Notice::destructive(
                    "Profile not found",
                    "The profile you're looking for doesn't exist.",
                )),
            ),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::Backend(_) => (
                StatusCode::BAD_GATEWAY,
                "BACKEND_ERROR",
                Some(Notice::destructive(
                    "Error loading profiles",
                    "Failed to load profiles. Please try again.",
                )),
            ),
            ApiError::Submission(err) => {
                let (status, code) = match err {
                    SubmissionError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    SubmissionError::FileRejected(_) => (StatusCode::BAD_REQUEST, "FILE_REJECTED"),
                    SubmissionError::Upload(_) => (StatusCode::BAD_GATEWAY, "UPLOAD_FAILED"),
                    SubmissionError::Persist(_) => (StatusCode::BAD_GATEWAY, "PERSIST_FAILED"),
                };
                (status, code, Some(err.notice()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, notice) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }

        let mut body = ErrorResponse::new(code, self.to_string());
        if let Some(notice) = notice {
            body = body.with_notice(notice);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
