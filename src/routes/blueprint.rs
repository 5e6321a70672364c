//! Blueprint verification endpoint
//!
//! `POST /parse-blueprint` takes a multipart upload in the `file` field,
//! hashes it and returns the blueprint payload if it is byte-identical to
//! the reference document.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::digest;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::upload::{allowed_file, TempUpload};

/// Multipart field carrying the uploaded document
pub const FILE_FIELD: &str = "file";

/// Successful verification response
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub message: &'static str,
    pub filename: String,
    pub data: Value,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/parse-blueprint", post(parse_blueprint))
}

async fn parse_blueprint(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseResponse>> {
    let limit = state.config().upload.max_content_length;

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!("Request is not a multipart upload: {}", rejection);
            return Err(AppError::FileNotFound);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(limit)
        } else {
            tracing::debug!("Failed to read multipart field: {}", e);
            AppError::FileNotFound
        }
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A part without a filename attribute is a plain form value, not a file
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        return verify_upload(&state, filename, field).await.map(Json);
    }

    Err(AppError::FileNotFound)
}

async fn verify_upload(
    state: &AppState,
    filename: String,
    mut field: Field<'_>,
) -> Result<ParseResponse> {
    let config = &state.config().upload;

    if filename.is_empty() {
        return Err(AppError::NoFileSelected);
    }
    if !allowed_file(&filename, &config.allowed_extensions) {
        return Err(AppError::FileTypeNotAllowed);
    }

    let mut upload = TempUpload::create(&config.dir, &filename).await?;

    let mut size = 0usize;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| body_error(e, config.max_content_length))?
    {
        size += chunk.len();
        upload.write_chunk(&chunk).await?;
    }
    upload.finish().await?;

    // Released whether or not hashing succeeded
    let hashed = digest::hash_file(upload.path()).await;
    let released = upload.release().await;
    let received_hash = hashed?;
    released?;

    let reference = state.reference();
    if !reference.matches(&received_hash) {
        tracing::info!(
            filename = %filename,
            size,
            received_hash = %received_hash,
            reference_hash = %reference.reference_hash(),
            "Upload hash mismatch"
        );
        return Err(AppError::HashMismatch);
    }

    tracing::info!(filename = %filename, size, "Blueprint verified");

    Ok(ParseResponse {
        message: "Blueprint parsed successfully",
        filename,
        data: reference.blueprint().clone(),
    })
}

fn body_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(limit)
    } else {
        AppError::Processing(e.body_text())
    }
}
