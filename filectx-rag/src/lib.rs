//! # filectx-rag
//!
//! The retrieval flows of the file-context pipeline: indexing extracted
//! content records into the vector store and answering questions grounded
//! in the top-k most similar stored entries.
//!
//! ```text
//! file → filectx-parser → ContentRecord → index() → filectx-embed → filectx-store
//! question → answer() → filectx-embed → filectx-store → ChatProvider → RagAnswer
//! ```
//!
//! Both external boundaries (embedding, chat) sit behind traits so tests
//! inject mocks and deployments pick their backend; Ollama-backed
//! implementations ship in-tree.
//!
//! ## Quick Start
//!
//! ```no_run
//! use filectx_embed::{EmbedConfig, OllamaEmbedder};
//! use filectx_rag::{ChatConfig, DEFAULT_TOP_K, OllamaChat, RagEngine};
//! use filectx_store::{StoreConfig, TinyStore};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = TinyStore::open(StoreConfig::new("data/vectorstore")).await?;
//! let engine = RagEngine::new(
//!     store,
//!     Arc::new(OllamaEmbedder::new(EmbedConfig::from_env())),
//!     Arc::new(OllamaChat::new(ChatConfig::from_env())),
//! );
//!
//! let record = filectx_parser::extract(Path::new("data/orders.csv"))?;
//! engine.index(&record).await?;
//!
//! let reply = engine.answer("how many orders are there?", DEFAULT_TOP_K).await?;
//! println!("{}", reply.answer);
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod engine;
pub mod error;

pub use chat::{
    ChatConfig, ChatError, ChatMessage, ChatProvider, DEFAULT_CHAT_MODEL, OllamaChat, Role,
};
pub use engine::{DEFAULT_TOP_K, IndexOutcome, RagAnswer, RagEngine};
pub use error::{RagError, Result};
