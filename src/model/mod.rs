//! Recommendation Model Module
//!
//! Owns the trained similarity artifact and serves "similar wine" queries from it.
//!
//! ## Overview
//! The artifact is produced out-of-band by an offline training job and consists of two
//! files: a feature transformer (item -> vector) and a similarity index over the vectors of
//! every item seen at training time. This module decides when it is safe to serve from that
//! artifact and degrades to "no recommendations" when it is missing or broken.
//!
//! ## Lifecycle
//! `Unloaded` -> `Loaded` on a successful load, `Unloaded`/`Unavailable` -> `Unavailable`
//! when the files are absent or fail to materialize. Once `Loaded`, a failed `reload()`
//! keeps the previous artifact serving.
//!
//! ## Submodules
//! - **`types`**: The artifact data model (transformer, index, on-disk documents) and status payload.
//! - **`error`**: Typed failures for materialization and query arguments.
//! - **`store`**: The `ArtifactStore` seam and its filesystem implementation.
//! - **`engine`**: The load/reload state machine and nearest-neighbour queries.
//! - **`startup`**: Bounded retry used while the artifact may still be provisioning.
//! - **`handlers`**: HTTP endpoints for model status and per-wine recommendations.

pub mod engine;
pub mod error;
pub mod handlers;
pub mod startup;
pub mod store;
pub mod types;
