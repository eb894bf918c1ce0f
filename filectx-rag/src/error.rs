//! Error types for the retrieval flows

use crate::chat::ChatError;
use filectx_embed::EmbedError;
use filectx_store::StoreError;

/// Result type for indexing and query flows.
pub type Result<T> = std::result::Result<T, RagError>;

/// Errors surfaced by [`RagEngine`](crate::RagEngine) operations.
///
/// Each variant wraps the failing boundary's own error. Nothing is retried
/// or swallowed here; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// The embedding service boundary failed
    #[error("embedding failed: {source}")]
    Embed {
        #[from]
        source: EmbedError,
    },

    /// The vector store failed
    #[error("vector store operation failed: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    /// The answer-generation boundary failed
    #[error("answer generation failed: {source}")]
    Answer {
        #[from]
        source: ChatError,
    },
}
