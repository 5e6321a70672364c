//! Route modules for the Blueprint Reader server

pub mod blueprint;
pub mod health;
pub mod index;
