//! Wine Recommendation Service Library
//!
//! This library crate defines the modules behind the wine recommendation binary (`main.rs`).
//!
//! ## Architecture Modules
//! - **`model`**: The recommendation serving engine. Owns the trained similarity artifact,
//!   decides when it is safe to serve from it, answers nearest-neighbour queries, and degrades
//!   to empty results when the artifact is missing or broken.
//! - **`catalog`**: The in-memory wine catalog. Handles browsing, filtered search, and
//!   hydration of recommended ids into full records.
//! - **`config`**: Command-line and environment configuration for the server.

pub mod catalog;
pub mod config;
pub mod model;
