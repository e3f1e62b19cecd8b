//! HTTP error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use super::types::ErrorResponse;
use crate::error::{StorageError, StoreError};

/// Error returned by handlers.
///
/// `NotFound` never distinguishes "expired" from "never existed".
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),
}

/// Message for every unknown or expired image.
pub(crate) const IMAGE_NOT_FOUND: &str = "Image not found or expired";

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound(IMAGE_NOT_FOUND.to_string()),
            StoreError::DuplicateId(id) => {
                error!(image_id = %id, "Identifier collision");
                Self::Internal("Failed to store image".to_string())
            },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidName(_) => Self::BadRequest("Invalid file name".to_string()),
            StorageError::NotFound(_) => Self::NotFound("File not found".to_string()),
            StorageError::Io { .. } => {
                error!(error = %e, "Storage failure");
                Self::Internal("Storage error".to_string())
            },
        }
    }
}
