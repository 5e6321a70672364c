//! Reference document loading
//!
//! Runs once before the listener is bound. The resulting [`ReferenceState`]
//! is immutable and shared read-only by every request.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ReferenceConfig;
use crate::digest;
use crate::error::StartupError;

/// Reference digest and blueprint payload, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct ReferenceState {
    reference_path: PathBuf,
    reference_hash: String,
    blueprint: Value,
}

impl ReferenceState {
    /// Validate the configured reference files and cache their contents.
    ///
    /// Parent directories are created if absent, even when the files are missing.
    pub async fn load(config: &ReferenceConfig) -> Result<Self, StartupError> {
        ensure_parent_dir(&config.pdf_path).await?;
        ensure_parent_dir(&config.data_path).await?;

        if !is_file(&config.pdf_path).await {
            return Err(StartupError::ReferenceNotFound(config.pdf_path.clone()));
        }
        if !is_file(&config.data_path).await {
            return Err(StartupError::DataNotFound(config.data_path.clone()));
        }

        let blueprint = load_blueprint(&config.data_path).await?;
        let reference_hash = digest::hash_file(&config.pdf_path)
            .await
            .map_err(|e| StartupError::io(&config.pdf_path, e))?;

        tracing::info!(
            reference = %config.pdf_path.display(),
            data = %config.data_path.display(),
            hash = %reference_hash,
            "Reference document loaded"
        );

        Ok(Self::from_parts(
            config.pdf_path.clone(),
            reference_hash,
            blueprint,
        ))
    }

    /// Build state from an already computed digest and payload
    pub fn from_parts(reference_path: PathBuf, reference_hash: String, blueprint: Value) -> Self {
        Self {
            reference_path,
            reference_hash: reference_hash.to_ascii_lowercase(),
            blueprint,
        }
    }

    /// Path of the reference PDF the digest was taken from
    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    pub fn reference_hash(&self) -> &str {
        &self.reference_hash
    }

    pub fn blueprint(&self) -> &Value {
        &self.blueprint
    }

    /// Whether `hash` is the digest of the reference file
    pub fn matches(&self, hash: &str) -> bool {
        digest::digests_match(&self.reference_hash, hash)
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn ensure_parent_dir(path: &Path) -> Result<(), StartupError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StartupError::io(parent, e)),
        _ => Ok(()),
    }
}

async fn load_blueprint(path: &Path) -> Result<Value, StartupError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| StartupError::io(path, e))?;

    serde_json::from_slice(&raw).map_err(|source| StartupError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}
