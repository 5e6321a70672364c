//! Error types for the Blueprint Reader server

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Per-request result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors that abort startup. Never converted into a response.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Reference file not found: {0}")]
    ReferenceNotFound(PathBuf),

    #[error("Blueprint data file not found: {0}")]
    DataNotFound(PathBuf),

    #[error("Invalid JSON format in blueprint data file {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StartupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StartupError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while handling an upload
#[derive(Error, Debug)]
pub enum AppError {
    #[error("File not found")]
    FileNotFound,

    #[error("No file selected")]
    NoFileSelected,

    #[error("File type not allowed")]
    FileTypeNotAllowed,

    #[error("The hash of the file does not match the reference file")]
    HashMismatch,

    #[error("File exceeds maximum upload size of {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Error processing file: {0}")]
    Processing(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::FileNotFound
            | AppError::NoFileSelected
            | AppError::FileTypeNotAllowed
            | AppError::HashMismatch => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Processing(e.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash_match: Option<bool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Processing(msg) => tracing::error!("Upload processing failed: {}", msg),
            AppError::HashMismatch => tracing::info!("Uploaded file does not match reference"),
            other => tracing::debug!("Rejected upload: {}", other),
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            hash_match: matches!(self, AppError::HashMismatch).then_some(false),
        });

        (status, body).into_response()
    }
}
