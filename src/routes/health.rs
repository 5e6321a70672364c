//! Health check endpoint
//!
//! Reports which reference document the running process verifies against.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Leading hex characters of the reference digest exposed by the check
const HASH_PREFIX_LEN: usize = 12;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub reference: ReferenceSummary,
}

#[derive(Serialize)]
pub struct ReferenceSummary {
    pub file: String,
    pub hash_prefix: String,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reference = state.reference();
    let hash = reference.reference_hash();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        reference: ReferenceSummary {
            file: reference
                .reference_path()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            hash_prefix: hash[..HASH_PREFIX_LEN.min(hash.len())].to_string(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
