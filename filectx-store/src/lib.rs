//! # filectx-store
//!
//! A tiny flat-file vector store: path-deduplicated append, linear cosine
//! search, and whole-store persistence across two companion artifacts
//! (a compressed f32 matrix plus a positionally aligned JSON metadata
//! array).
//!
//! This is deliberately not a general-purpose vector database. There is no
//! approximate-nearest-neighbor index, no sharding, and no locking: a
//! single writer is assumed, every mutation rewrites the full store, and
//! search is a linear scan. At the intended scale (hundreds to low
//! thousands of documents) that trade keeps the format trivially
//! inspectable and the consistency story simple: both artifacts always
//! change together, and any desync between them is detected on load as a
//! fatal [`StoreError::Corruption`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use filectx_store::{EntryMetadata, StoreConfig, TinyStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = TinyStore::open(StoreConfig::new("data/vectorstore")).await?;
//!
//! if !store.already_indexed("notes.txt").await? {
//!     let metadata = EntryMetadata {
//!         path: "notes.txt".into(),
//!         kind: "text".into(),
//!         summary: serde_json::json!({"n_chars": 42, "preview": "hello"}),
//!         embed_text: Some("Document notes:\nhello".into()),
//!     };
//!     store.add(vec![vec![0.0; store.dimension()]], vec![metadata]).await?;
//! }
//!
//! let hits = store.search(&vec![0.0; store.dimension()], 4).await?;
//! println!("{} hits", hits.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod tiny_store;

pub use error::{Result, StoreError};
pub use tiny_store::{
    DEFAULT_DIMENSION, EntryMetadata, SearchHit, StoreConfig, TinyStore, cosine_similarity,
};
