//! Model Error Types
//!
//! Every failure the artifact path can produce is recoverable: the engine records the
//! message for `status()` and keeps serving (or keeps returning empty results).

use std::path::PathBuf;
use thiserror::Error;

/// Identifies which of the two artifact files a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactPart {
    Transformer,
    Index,
}

impl std::fmt::Display for ArtifactPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactPart::Transformer => write!(f, "transformer"),
            ArtifactPart::Index => write!(f, "index"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{part} file not found: {}", path.display())]
    Missing { part: ArtifactPart, path: PathBuf },

    #[error("failed to read {part} file {}: {source}", path.display())]
    Unreadable {
        part: ArtifactPart,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deserialize {part} file {}: {source}", path.display())]
    Corrupt {
        part: ArtifactPart,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {part}: {reason}")]
    Invalid { part: ArtifactPart, reason: String },

    #[error(
        "transformer/index mismatch: transformer dimension {transformer_dimension}, index dimension {index_dimension}"
    )]
    Mismatch {
        transformer_dimension: usize,
        index_dimension: usize,
    },
}

impl ArtifactError {
    /// The artifact file the failure refers to, if it is attributable to one.
    pub fn part(&self) -> Option<ArtifactPart> {
        match self {
            ArtifactError::Missing { part, .. }
            | ArtifactError::Unreadable { part, .. }
            | ArtifactError::Corrupt { part, .. }
            | ArtifactError::Invalid { part, .. } => Some(*part),
            ArtifactError::Mismatch { .. } => None,
        }
    }
}

/// Caller contract violations on `recommend`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("top_k must be non-negative, got {0}")]
    InvalidTopK(i64),
}
