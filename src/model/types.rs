//! Model Data Types
//!
//! Defines the in-memory artifact (transformer + similarity index), the JSON documents the
//! offline training job writes to disk, and the status payload exposed to callers.
//!
//! ## On-disk contract
//! - Transformer document: `{"format_version": 1, "dimension": D, "features": {"<id>": [f32; D]}}`
//! - Index document: `{"format_version": 1, "dimension": D, "entries": [{"id": <id>, "vector": [f32; D]}]}`

use super::error::{ArtifactError, ArtifactPart};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

/// Catalog identifier of a wine.
pub type ItemId = u64;

/// The only artifact format version this engine understands.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized form of the feature transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerDocument {
    pub format_version: u32,
    pub dimension: usize,
    pub features: BTreeMap<ItemId, Vec<f32>>,
}

/// A single row of the serialized similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: ItemId,
    pub vector: Vec<f32>,
}

/// Serialized form of the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    pub format_version: u32,
    pub dimension: usize,
    pub entries: Vec<IndexEntry>,
}

/// Maps a catalog item to its (L2-normalised) feature vector.
///
/// Vectors were produced from item attributes at training time; items outside the
/// training corpus have no mapping.
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    dimension: usize,
    features: HashMap<ItemId, Vec<f32>>,
}

impl FeatureTransformer {
    pub fn from_document(doc: TransformerDocument) -> Result<Self, ArtifactError> {
        let part = ArtifactPart::Transformer;
        check_header(part, doc.format_version, doc.dimension)?;

        let mut features = HashMap::with_capacity(doc.features.len());
        for (id, vector) in doc.features {
            check_vector(part, id, &vector, doc.dimension)?;
            features.insert(id, normalize(vector));
        }

        Ok(Self {
            dimension: doc.dimension,
            features,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the item's vector, or `None` if the item was not seen at training time.
    pub fn transform(&self, item_id: ItemId) -> Option<&[f32]> {
        self.features.get(&item_id).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
struct IndexedVector {
    id: ItemId,
    vector: Vec<f32>,
}

/// Exact nearest-neighbour index using cosine similarity.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dimension: usize,
    entries: Vec<IndexedVector>,
}

impl SimilarityIndex {
    pub fn from_document(doc: IndexDocument) -> Result<Self, ArtifactError> {
        let part = ArtifactPart::Index;
        check_header(part, doc.format_version, doc.dimension)?;

        let mut seen = HashSet::with_capacity(doc.entries.len());
        let mut entries = Vec::with_capacity(doc.entries.len());
        for entry in doc.entries {
            if !seen.insert(entry.id) {
                return Err(ArtifactError::Invalid {
                    part,
                    reason: format!("duplicate item id {}", entry.id),
                });
            }
            check_vector(part, entry.id, &entry.vector, doc.dimension)?;
            entries.push(IndexedVector {
                id: entry.id,
                vector: normalize(entry.vector),
            });
        }

        Ok(Self {
            dimension: doc.dimension,
            entries,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns up to `top_k` item ids ordered by descending similarity to `query`.
    ///
    /// `exclude` is never part of the result. Equal similarities order by ascending id.
    pub fn nearest(&self, query: &[f32], exclude: ItemId, top_k: usize) -> Vec<ItemId> {
        if top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f32, ItemId)> = self
            .entries
            .iter()
            .filter(|entry| entry.id != exclude)
            .map(|entry| (cosine(query, &entry.vector), entry.id))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.truncate(top_k);
        scored.into_iter().map(|(_, id)| id).collect()
    }
}

/// A fully materialized, immutable model. Replacing it means swapping the whole value.
#[derive(Debug)]
pub struct Artifact {
    pub transformer: FeatureTransformer,
    pub index: SimilarityIndex,
    /// Timestamp (ms) when the artifact was materialized.
    pub loaded_at: u64,
}

impl Artifact {
    /// Pairs a transformer with an index, rejecting the pair if their dimensions disagree.
    pub fn new(
        transformer: FeatureTransformer,
        index: SimilarityIndex,
    ) -> Result<Self, ArtifactError> {
        if transformer.dimension() != index.dimension() {
            return Err(ArtifactError::Mismatch {
                transformer_dimension: transformer.dimension(),
                index_dimension: index.dimension(),
            });
        }

        Ok(Self {
            transformer,
            index,
            loaded_at: now_ms(),
        })
    }
}

/// Lifecycle state of a `RecommendationEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// No load has been attempted yet, or the first attempt failed to materialize.
    Unloaded,
    /// An artifact is installed and serving.
    Loaded,
    /// The artifact files are absent or could not be materialized.
    Unavailable,
}

/// Where the two artifact parts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocations {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
}

/// Introspection payload returned by `RecommendationEngine::status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub state: EngineState,
    pub model_loaded: bool,
    pub model_available: bool,
    pub model_path: String,
    pub vectorizer_path: String,
    pub last_error: Option<String>,
    pub indexed_items: Option<usize>,
    pub dimension: Option<usize>,
}

fn check_header(part: ArtifactPart, version: u32, dimension: usize) -> Result<(), ArtifactError> {
    if version != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::Invalid {
            part,
            reason: format!(
                "unsupported format_version {} (expected {})",
                version, ARTIFACT_FORMAT_VERSION
            ),
        });
    }
    if dimension == 0 {
        return Err(ArtifactError::Invalid {
            part,
            reason: "dimension must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn check_vector(
    part: ArtifactPart,
    id: ItemId,
    vector: &[f32],
    dimension: usize,
) -> Result<(), ArtifactError> {
    if vector.len() != dimension {
        return Err(ArtifactError::Invalid {
            part,
            reason: format!(
                "item {} has {} components, expected {}",
                id,
                vector.len(),
                dimension
            ),
        });
    }
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(ArtifactError::Invalid {
            part,
            reason: format!("item {} has a non-finite component", id),
        });
    }
    Ok(())
}

fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

/// Dot product of two normalised vectors. Zero vectors score 0 against everything.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    // `+ 0.0` folds -0.0 into 0.0 so equal scores compare equal under total_cmp
    a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>() + 0.0
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
