//! Recommendation Engine
//!
//! Wraps an `ArtifactStore` with the load/reload state machine and answers
//! nearest-neighbour queries against the currently installed artifact.
//!
//! ## Concurrency
//! - **Reads**: `recommend()` takes a lock-free snapshot of the current artifact
//!   (`ArcSwapOption::load_full`), so a concurrent install can never produce a torn view.
//! - **Writes**: `load()`/`reload()` serialize on `load_lock`; the lock is held only around
//!   the check-then-install sequence, never by readers.
//! - **Diagnostics**: state and last error sit behind a short-lived `RwLock` that is only
//!   written after a load attempt has finished.

use super::error::RecommendError;
use super::store::{ArtifactStore, FileArtifactStore};
use super::types::{Artifact, EngineState, ItemId, ModelStatus};

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::Arc;

/// Default number of neighbours the HTTP layer asks for.
pub const DEFAULT_TOP_K: i64 = 10;

#[derive(Debug)]
struct Diagnostics {
    state: EngineState,
    last_error: Option<String>,
    /// Number of finished load attempts. Bumped under `load_lock`.
    attempts: u64,
}

pub struct RecommendationEngine {
    store: Arc<dyn ArtifactStore>,
    current: ArcSwapOption<Artifact>,
    load_lock: Mutex<()>,
    diagnostics: RwLock<Diagnostics>,
}

impl RecommendationEngine {
    /// Creates an engine in the `Unloaded` state. Nothing is read until `load()`.
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            current: ArcSwapOption::empty(),
            load_lock: Mutex::new(()),
            diagnostics: RwLock::new(Diagnostics {
                state: EngineState::Unloaded,
                last_error: None,
                attempts: 0,
            }),
        }
    }

    /// Creates an engine backed by the two JSON files at the given paths.
    pub fn from_paths(model_path: impl Into<PathBuf>, vectorizer_path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileArtifactStore::new(model_path, vectorizer_path)))
    }

    /// Whether both artifact files exist. Says nothing about whether they are loaded.
    pub fn is_available(&self) -> bool {
        self.store.locate()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn state(&self) -> EngineState {
        if self.is_loaded() {
            EngineState::Loaded
        } else {
            self.diagnostics.read().state
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.diagnostics.read().last_error.clone()
    }

    /// Stable snapshot of the installed artifact, if any.
    pub fn artifact(&self) -> Option<Arc<Artifact>> {
        self.current.load_full()
    }

    /// Loads the artifact unless one is already installed.
    ///
    /// Concurrent callers serialize. A caller that waited on an in-flight attempt takes that
    /// attempt's outcome instead of touching the store again.
    pub fn load(&self) -> bool {
        if self.is_loaded() {
            return true;
        }

        let observed = self.diagnostics.read().attempts;
        let _guard = self.load_lock.lock();
        if self.is_loaded() {
            return true;
        }
        if self.diagnostics.read().attempts != observed {
            // Another caller finished an attempt while we waited, and it did not install.
            return false;
        }
        self.load_locked()
    }

    /// Materializes the artifact again and replaces the installed one on success.
    ///
    /// On failure the previous artifact (if any) keeps serving.
    pub fn reload(&self) -> bool {
        let _guard = self.load_lock.lock();
        self.load_locked()
    }

    // Caller must hold `load_lock`.
    fn load_locked(&self) -> bool {
        if !self.store.locate() {
            let locations = self.store.locations();
            let message = format!(
                "model files not found (model: {}, vectorizer: {})",
                locations.model_path.display(),
                locations.vectorizer_path.display()
            );
            tracing::warn!("{}", message);
            self.record_failure(message, EngineState::Unavailable);
            return false;
        }

        match self.store.materialize() {
            Ok(artifact) => {
                tracing::info!(
                    "Recommendation model loaded: {} indexed items, {} transformer rows, dimension {}",
                    artifact.index.len(),
                    artifact.transformer.len(),
                    artifact.index.dimension()
                );
                self.current.store(Some(Arc::new(artifact)));
                let mut diagnostics = self.diagnostics.write();
                diagnostics.state = EngineState::Loaded;
                diagnostics.last_error = None;
                diagnostics.attempts += 1;
                true
            }
            Err(e) => {
                tracing::error!("Failed to load recommendation model: {}", e);
                let state = self.diagnostics.read().state;
                self.record_failure(e.to_string(), state);
                false
            }
        }
    }

    fn record_failure(&self, message: String, state: EngineState) {
        let mut diagnostics = self.diagnostics.write();
        // An installed artifact keeps serving through a failed reload.
        if !self.is_loaded() {
            diagnostics.state = state;
        }
        diagnostics.last_error = Some(message);
        diagnostics.attempts += 1;
    }

    /// Returns up to `top_k` wine ids most similar to `item_id`, most similar first.
    ///
    /// An engine without a model, or an item the transformer has never seen, yields an
    /// empty list. Only a negative `top_k` is an error.
    pub fn recommend(&self, item_id: ItemId, top_k: i64) -> Result<Vec<ItemId>, RecommendError> {
        let top_k = usize::try_from(top_k).map_err(|_| RecommendError::InvalidTopK(top_k))?;

        let Some(artifact) = self.current.load_full() else {
            tracing::debug!("Recommendation for {} skipped: model not loaded", item_id);
            return Ok(Vec::new());
        };

        let Some(query) = artifact.transformer.transform(item_id) else {
            tracing::debug!("Recommendation for {} skipped: item not in training corpus", item_id);
            return Ok(Vec::new());
        };

        Ok(artifact.index.nearest(query, item_id, top_k))
    }

    pub fn status(&self) -> ModelStatus {
        let artifact = self.current.load_full();
        let (state, last_error) = {
            let diagnostics = self.diagnostics.read();
            (diagnostics.state, diagnostics.last_error.clone())
        };
        let locations = self.store.locations();

        ModelStatus {
            state: if artifact.is_some() {
                EngineState::Loaded
            } else {
                state
            },
            model_loaded: artifact.is_some(),
            model_available: self.store.locate(),
            model_path: locations.model_path.display().to_string(),
            vectorizer_path: locations.vectorizer_path.display().to_string(),
            last_error,
            indexed_items: artifact.as_ref().map(|a| a.index.len()),
            dimension: artifact.as_ref().map(|a| a.index.dimension()),
        }
    }
}
