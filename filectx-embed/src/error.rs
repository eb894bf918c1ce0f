//! Error types for the embedding boundary

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Errors from the embedding service boundary.
///
/// A batch call fails atomically: the first per-text failure aborts the
/// whole call and no partial results are returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The external embedding service call failed (connection, HTTP status,
    /// or body decoding).
    #[error("embedding service call failed: {source}")]
    Service {
        #[from]
        source: reqwest::Error,
    },

    /// The service answered, but not with a usable embedding.
    #[error("embedding service returned an invalid response: {message}")]
    InvalidResponse { message: String },

    /// The service returned a vector of an unexpected length.
    #[error("embedding dimension {actual} does not match configured dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl EmbedError {
    /// Create an invalid-response error with a custom message.
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
