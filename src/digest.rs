//! File digests
//!
//! SHA-256 over a file's full byte content, read in fixed-size chunks so
//! memory stays bounded regardless of file size. Output is lowercase hex.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read size used for every on-disk digest
pub const CHUNK_SIZE: usize = 4096;

/// Compute the digest of a file on disk
pub async fn hash_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let file = tokio::fs::File::open(path.as_ref()).await?;
    hash_reader(file, CHUNK_SIZE).await
}

/// Compute the digest of everything `reader` yields, `chunk_size` bytes at a time
pub async fn hash_reader<R>(mut reader: R, chunk_size: usize) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Digest of an in-memory buffer
#[cfg(test)]
pub(crate) fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Case-insensitive comparison of two hex digests
pub fn digests_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
