//! # filectx-embed
//!
//! The embedding boundary for the file-context pipeline: a small trait for
//! turning batches of text into fixed-dimension vectors, with an
//! implementation backed by a locally hosted Ollama server.
//!
//! The provider is treated as an opaque external service. Batches are
//! order-preserving and atomic: if embedding any text in a batch fails,
//! the whole call fails with [`EmbedError`] and no partial results are
//! returned. Retry policy, if any, belongs to the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use filectx_embed::{EmbedConfig, EmbeddingProvider, OllamaEmbedder};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = OllamaEmbedder::new(EmbedConfig::from_env());
//!
//! let texts = vec!["Table with 3 rows and 2 columns.".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//! println!("{} embeddings of dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;

pub use config::{DEFAULT_BASE_URL, DEFAULT_DIMENSION, DEFAULT_EMBED_MODEL, EmbedConfig};
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, OllamaEmbedder};
