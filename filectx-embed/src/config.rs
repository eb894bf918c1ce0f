//! Configuration for the embedding service boundary

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default embedding model served by Ollama.
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Embedding dimension of the default model.
pub const DEFAULT_DIMENSION: usize = 768;

/// Configuration for an embedding provider instance.
///
/// Passed explicitly to constructors; there is no module-level state. The
/// dimension here must agree with the vector store the embeddings land in;
/// a provider that returns differently sized vectors fails loudly with
/// [`EmbedError::DimensionMismatch`](crate::EmbedError::DimensionMismatch).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmbedConfig {
    /// Base URL of the embedding service (no trailing path)
    pub base_url: String,
    /// Model name requested from the service
    pub model: String,
    /// Expected length of every returned vector
    pub dimension: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_EMBED_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl EmbedConfig {
    /// Create a configuration for `model` against the default endpoint.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Read `OLLAMA_HOST` and `EMBED_MODEL` from the environment, falling
    /// back to the defaults.
    pub fn from_env() -> Self {
        Self::from_env_lookup(
            std::env::var("OLLAMA_HOST").ok(),
            std::env::var("EMBED_MODEL").ok(),
        )
    }

    fn from_env_lookup(host: Option<String>, model: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = host {
            config.base_url = host;
        }
        if let Some(model) = model {
            config.model = model;
        }
        config
    }

    /// Override the service endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the expected embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}
