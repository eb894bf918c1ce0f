//! Embedding provider implementations

use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// The generated embeddings, one per input text, in input order
    pub embeddings: Vec<Vec<f32>>,
    /// The dimension of each embedding vector
    pub dimension: usize,
}

impl EmbeddingResult {
    /// Create a new result, inferring the dimension from the first vector
    /// (0 if the result is empty).
    pub fn new(embeddings: Vec<Vec<f32>>) -> Self {
        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimension,
        }
    }

    /// Number of embedding vectors in this result.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Returns `true` if this result contains no embedding vectors.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// Trait for embedding providers that map texts to fixed-dimension vectors.
///
/// Implementations must be order-preserving (vector `i` embeds text `i`) and
/// atomic per batch: if any input fails, the whole call fails and no partial
/// result is returned.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult>;

    /// Get the dimension of embeddings produced by this provider
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this provider
    fn provider_name(&self) -> &str;
}

#[derive(Serialize)]
struct OllamaEmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingsResponse {
    embedding: Vec<f32>,
}

/// Embedding provider backed by an Ollama server's `/api/embeddings`
/// endpoint.
///
/// The endpoint embeds one prompt per request, so a batch is a sequence of
/// calls; the first failure aborts the remainder.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    config: EmbedConfig,
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a provider for the given configuration.
    pub fn new(config: EmbedConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// The configuration this provider was built with.
    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!(
            "{}/api/embeddings",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .json(&OllamaEmbeddingsRequest {
                model: &self.config.model,
                prompt: text,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: OllamaEmbeddingsResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(EmbedError::invalid_response("empty embedding returned"));
        }
        if body.embedding.len() != self.config.dimension {
            return Err(EmbedError::DimensionMismatch {
                expected: self.config.dimension,
                actual: body.embedding.len(),
            });
        }
        Ok(body.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text.to_string()];
        let result = self.embed_texts(&texts).await?;
        result
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::invalid_response("no embedding generated for text"))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        if texts.is_empty() {
            return Ok(EmbeddingResult::new(vec![]));
        }

        tracing::debug!(
            "Generating embeddings for {} texts via {}",
            texts.len(),
            self.config.model
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }

        tracing::debug!("Generated {} embeddings", embeddings.len());
        Ok(EmbeddingResult::new(embeddings))
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}
