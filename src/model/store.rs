//! Artifact Store
//!
//! Locates and materializes the two artifact files. The store never holds state of its own
//! and never performs recommendation logic; the engine decides what to do with the result.

use super::error::{ArtifactError, ArtifactPart};
use super::types::{
    Artifact, ArtifactLocations, FeatureTransformer, IndexDocument, SimilarityIndex,
    TransformerDocument,
};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Default location of the similarity index written by the training job.
pub const DEFAULT_MODEL_PATH: &str = "models/wine_recommendation_model.json";
/// Default location of the feature transformer written by the training job.
pub const DEFAULT_VECTORIZER_PATH: &str = "models/wine_vectorizer.json";

/// Source of trained artifacts.
///
/// `locate` is a cheap existence probe; `materialize` returns a complete artifact or a
/// failure, never a half-built one.
pub trait ArtifactStore: Send + Sync {
    fn locate(&self) -> bool;
    fn materialize(&self) -> Result<Artifact, ArtifactError>;
    fn locations(&self) -> ArtifactLocations;
}

/// Reads the artifact from two JSON files on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    model_path: PathBuf,
    vectorizer_path: PathBuf,
}

impl FileArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>, vectorizer_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            vectorizer_path: vectorizer_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn vectorizer_path(&self) -> &Path {
        &self.vectorizer_path
    }
}

impl Default for FileArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH)
    }
}

impl ArtifactStore for FileArtifactStore {
    fn locate(&self) -> bool {
        self.model_path.exists() && self.vectorizer_path.exists()
    }

    fn materialize(&self) -> Result<Artifact, ArtifactError> {
        let transformer_doc: TransformerDocument =
            read_document(ArtifactPart::Transformer, &self.vectorizer_path)?;
        let index_doc: IndexDocument = read_document(ArtifactPart::Index, &self.model_path)?;

        let transformer = FeatureTransformer::from_document(transformer_doc)?;
        let index = SimilarityIndex::from_document(index_doc)?;

        tracing::debug!(
            "Materialized artifact: {} transformer rows, {} index rows",
            transformer.len(),
            index.len()
        );

        Artifact::new(transformer, index)
    }

    fn locations(&self) -> ArtifactLocations {
        ArtifactLocations {
            model_path: self.model_path.clone(),
            vectorizer_path: self.vectorizer_path.clone(),
        }
    }
}

fn read_document<T: DeserializeOwned>(part: ArtifactPart, path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                part,
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Unreadable {
                part,
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Corrupt {
        part,
        path: path.to_path_buf(),
        source,
    })
}
