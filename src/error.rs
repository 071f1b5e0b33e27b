use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use axum::extract::multipart::MultipartError;
use thiserror::Error;

use crate::models::FieldErrors;
use crate::services::excel::SummaryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input")]
    Validation(FieldErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Summary(SummaryError::Parse { .. }) => StatusCode::BAD_REQUEST,
            AppError::Summary(SummaryError::UnknownColumn { .. }) => StatusCode::BAD_REQUEST,
            AppError::Summary(SummaryError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Summary(SummaryError::EmptyWorksheet { .. })
            | AppError::Summary(SummaryError::Overflow { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a multipart read failure. `max_file_size` is the configured upload limit.
    pub fn from_multipart(err: MultipartError, max_file_size: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!(
                "files may be at most {} bytes",
                max_file_size
            ))
        } else {
            AppError::InvalidInput(err.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = match self {
            AppError::Validation(details) => Json(json!({
                "error": "Invalid input",
                "details": details
            })),
            other => Json(json!({
                "error": other.to_string()
            })),
        };

        (status, body).into_response()
    }
}
