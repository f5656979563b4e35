//! Wine Catalog Module
//!
//! In-memory record store for wines. It answers browsing and attribute-filtered search
//! requests and hydrates the bare ids returned by the recommendation engine into full records.
//!
//! ## Submodules
//! - **`types`**: The `Wine` record and the DTOs used by the HTTP layer.
//! - **`store`**: `WineCatalog`, a concurrent map keyed by wine id.
//! - **`handlers`**: HTTP request handlers for listing, lookup, search, and statistics.

pub mod handlers;
pub mod store;
pub mod types;
