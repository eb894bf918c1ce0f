//! Error types for the vector store

use std::path::PathBuf;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by [`TinyStore`](crate::TinyStore) operations.
///
/// `Corruption` is deliberately fatal: the vector artifact and the metadata
/// artifact are positionally coupled, and a store that silently tolerated a
/// desync would return the wrong document for a given score.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persisted artifacts disagree with each other.
    #[error("store corruption in {root}: {detail}")]
    Corruption { root: PathBuf, detail: String },

    /// A vector's length does not match the store's configured dimension.
    #[error("vector of length {actual} does not match store dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `add` was called with differing numbers of vectors and metadata entries.
    #[error("{vectors} vectors paired with {metadatas} metadata entries")]
    LengthMismatch { vectors: usize, metadatas: usize },

    /// IO errors while reading or writing the artifacts
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Metadata artifact could not be serialized or deserialized
    #[error("metadata serialization failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create a corruption error for the store rooted at `root`.
    pub fn corruption(root: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Corruption {
            root: root.into(),
            detail: detail.into(),
        }
    }
}
