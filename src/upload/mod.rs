//! Upload Module
//!
//! Request-scoped handling of an uploaded file:
//! - Filename validation against the extension allow-list
//! - Filename sanitisation for on-disk use
//! - Temporary storage that is always removed once the digest is taken

pub mod filename;
pub mod temp_file;

pub use filename::{allowed_file, extension, secure_filename};
pub use temp_file::TempUpload;
