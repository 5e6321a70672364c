//! Blueprint Reader Server Library
//!
//! Verifies uploaded PDFs against a single reference document by SHA-256
//! digest and returns the associated blueprint data on a match.
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `reference`: startup loading of the reference digest and payload
//! - `routes`: HTTP handlers (`/`, `/health`, `/parse-blueprint`)
//! - `upload`: filename checks and temporary upload storage
//! - `digest`: streaming SHA-256

pub mod config;
pub mod digest;
pub mod error;
pub mod reference;
pub mod routes;
pub mod server;
pub mod state;
pub mod upload;

pub use config::Config;
pub use reference::ReferenceState;
pub use server::{app, run};
pub use state::AppState;
