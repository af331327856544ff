//! API error type and its HTTP mapping
//!
//! Validation failures become 400, conversion failures 500. The body is
//! always `{"error": "<message>"}`.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::convert::ConvertError;

/// A request the handlers refuse to process
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file provided")]
    NoFile,

    #[error("Empty filename")]
    EmptyFilename,

    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("Invalid format. Only 'png' and 'jpeg' are supported.")]
    InvalidFormat(String),

    #[error("No pages found in PDF")]
    NoPages,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(ConvertError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::NoPages => ApiError::Validation(ValidationError::NoPages),
            other => ApiError::Conversion(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart(e) => e.status(),
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Multipart(e) => e.body_text(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!("Conversion failed: {}", message);
        } else {
            warn!("Rejected request ({}): {}", status.as_u16(), message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
