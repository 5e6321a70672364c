#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use blueprint_verifier::{app, config::Config, server, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "blueprint-test-boundary";

/// A fake but stable reference document
pub fn reference_pdf() -> Vec<u8> {
    let mut pdf = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n".to_vec();
    pdf.extend((0..10_000u32).map(|i| (i % 256) as u8));
    pdf.extend_from_slice(b"\n%%EOF\n");
    pdf
}

pub fn blueprint_json() -> Value {
    json!({
        "project": "Residence A",
        "floors": [
            { "level": 1, "rooms": ["kitchen", "living"] },
            { "level": 2, "rooms": ["bedroom", "bath"] }
        ],
        "area_m2": 142.5
    })
}

pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    /// Reference files on disk plus a config pointing at them
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.reference.pdf_path = dir.path().join("in").join("bp_1.pdf");
        config.reference.data_path = dir.path().join("data").join("blueprint_data.json");
        config.upload.dir = dir.path().join("uploads");
        adjust(&mut config);

        std::fs::create_dir_all(config.reference.pdf_path.parent().unwrap()).unwrap();
        std::fs::create_dir_all(config.reference.data_path.parent().unwrap()).unwrap();
        std::fs::write(&config.reference.pdf_path, reference_pdf()).unwrap();
        std::fs::write(
            &config.reference.data_path,
            serde_json::to_vec_pretty(&blueprint_json()).unwrap(),
        )
        .unwrap();

        Self { dir, config }
    }

    pub async fn router(&self) -> Router {
        let reference = server::prepare(&self.config).await.unwrap();
        app(AppState::new(self.config.clone(), reference))
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload.dir.clone()
    }
}

pub fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// One multipart part: field name, optional filename, content
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(filename: &'a str, content: &'a [u8]) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            content,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/pdf\r\n");
            }
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_parts(router: Router, parts: &[Part<'_>]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/parse-blueprint")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn post_file(router: Router, filename: &str, content: &[u8]) -> (StatusCode, Value) {
    post_parts(router, &[Part::file(filename, content)]).await
}
