//! Temporary upload storage
//!
//! A [`TempUpload`] owns one `NamedTempFile` under the upload directory.
//! [`TempUpload::release`] deletes it on the normal path; dropping the
//! guard deletes it on any path that bails out early.

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::filename::secure_filename;

/// Longest slice of the sanitised client filename kept in the temp name
pub const MAX_NAME_SUFFIX: usize = 64;

const TEMP_PREFIX: &str = "upload-";

pub struct TempUpload {
    named: NamedTempFile,
    writer: Option<File>,
}

impl TempUpload {
    /// Create an empty temp file for `original_name` under `dir`.
    ///
    /// The name is `upload-<random>_<tail of sanitised name>`; the random
    /// part keeps concurrent same-name uploads apart.
    pub async fn create(dir: &Path, original_name: &str) -> io::Result<Self> {
        let named = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&name_suffix(original_name))
            .tempfile_in(dir)?;
        let writer = File::from_std(named.reopen()?);

        tracing::debug!(path = %named.path().display(), "Created temp upload");

        Ok(Self {
            named,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        self.named.path()
    }

    /// Append bytes to the temp file
    pub async fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(data).await,
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "temp upload already closed for writing",
            )),
        }
    }

    /// Flush and close the write handle so the content can be read back
    pub async fn finish(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
        }
        Ok(())
    }

    /// Delete the temp file, reporting a failed removal
    pub async fn release(mut self) -> io::Result<()> {
        self.writer.take();
        let path = self.named.path().to_path_buf();
        self.named.close()?;
        tracing::debug!(path = %path.display(), "Removed temp upload");
        Ok(())
    }
}

/// `_<name>` using at most the last [`MAX_NAME_SUFFIX`] bytes of the
/// sanitised filename, so the extension survives truncation
fn name_suffix(original_name: &str) -> String {
    let safe = secure_filename(original_name);
    if safe.is_empty() {
        return String::new();
    }
    // secure_filename output is ASCII, so any byte offset is a char boundary
    let tail = &safe[safe.len().saturating_sub(MAX_NAME_SUFFIX)..];
    format!("_{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_write_and_release() {
        let temp_dir = TempDir::new().unwrap();
        let mut upload = TempUpload::create(temp_dir.path(), "copy.pdf").await.unwrap();

        upload.write_chunk(b"Hello, ").await.unwrap();
        upload.write_chunk(b"World!").await.unwrap();
        upload.finish().await.unwrap();

        let path = upload.path().to_path_buf();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("upload-"));
        assert!(name.ends_with("_copy.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"Hello, World!");

        upload.release().await.unwrap();
        assert!(!path.exists());
        assert_eq!(entries(temp_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let mut upload = TempUpload::create(temp_dir.path(), "bp_1.pdf").await.unwrap();
            upload.write_chunk(b"partial").await.unwrap();
            upload.path().to_path_buf()
        };

        assert!(!path.exists());
        assert_eq!(entries(temp_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_paths() {
        let temp_dir = TempDir::new().unwrap();
        let a = TempUpload::create(temp_dir.path(), "bp_1.pdf").await.unwrap();
        let b = TempUpload::create(temp_dir.path(), "bp_1.pdf").await.unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(entries(temp_dir.path()), 2);

        a.release().await.unwrap();
        b.release().await.unwrap();
        assert_eq!(entries(temp_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_long_name_is_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let long_name = format!("{}.pdf", "a".repeat(300));

        let mut upload = TempUpload::create(temp_dir.path(), &long_name).await.unwrap();
        upload.write_chunk(b"%PDF").await.unwrap();
        upload.finish().await.unwrap();

        let name = upload.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.len() < 100, "{name}");
        assert!(name.ends_with("aaaa.pdf"));

        upload.release().await.unwrap();
        assert_eq!(entries(temp_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_unsafe_name_stays_inside_dir() {
        let temp_dir = TempDir::new().unwrap();
        let upload = TempUpload::create(temp_dir.path(), "../../escape.pdf").await.unwrap();
        assert_eq!(upload.path().parent().unwrap(), temp_dir.path());

        let empty = TempUpload::create(temp_dir.path(), "...").await.unwrap();
        assert_eq!(empty.path().parent().unwrap(), temp_dir.path());
    }

    #[tokio::test]
    async fn test_write_after_finish_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut upload = TempUpload::create(temp_dir.path(), "a.pdf").await.unwrap();
        upload.finish().await.unwrap();

        assert!(upload.write_chunk(b"late").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = TempUpload::create(&temp_dir.path().join("gone"), "a.pdf").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_name_suffix() {
        assert_eq!(name_suffix("copy.pdf"), "_copy.pdf");
        assert_eq!(name_suffix("..."), "");
        let long = name_suffix(&format!("{}.pdf", "b".repeat(200)));
        assert_eq!(long.len(), MAX_NAME_SUFFIX + 1);
        assert!(long.ends_with(".pdf"));
    }
}
