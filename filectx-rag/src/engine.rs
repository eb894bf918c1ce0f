//! Indexing and query flows over the vector store
//!
//! [`RagEngine`] wires the three boundaries together: parser output comes
//! in as a [`ContentRecord`], the embedding provider turns bounded text
//! into vectors, the store persists and searches them, and the chat
//! provider grounds its answer in the retrieved context.

use crate::chat::{ChatMessage, ChatProvider};
use crate::error::Result;
use filectx_embed::EmbeddingProvider;
use filectx_parser::ContentRecord;
use filectx_store::{EntryMetadata, SearchHit, TinyStore};
use serde::Serialize;
use std::sync::Arc;

/// Default number of entries retrieved per query.
pub const DEFAULT_TOP_K: usize = 4;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Use ONLY the provided context to \
     answer. If the answer is in the document text, extract it directly.";

/// Placeholder substituted when a search legitimately returns zero hits.
const NO_CONTEXT_MARKER: &str = "<no context>";

/// Outcome of an indexing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexOutcome {
    pub indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl IndexOutcome {
    fn indexed() -> Self {
        Self {
            indexed: true,
            reason: None,
        }
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            indexed: false,
            reason: Some(reason.into()),
        }
    }
}

/// A grounded answer plus the entries it was grounded in, so callers can
/// audit what the model saw.
#[derive(Debug, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    pub context_used: Vec<SearchHit>,
}

/// The retrieval engine: a store plus the two external boundaries.
///
/// All dependencies are injected; there is no module-level state, so tests
/// and callers can run any number of independent engines side by side.
pub struct RagEngine {
    store: TinyStore,
    embedder: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatProvider>,
}

impl RagEngine {
    /// Create an engine over an opened store and the two providers.
    pub fn new(
        store: TinyStore,
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            store,
            embedder,
            chat,
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &TinyStore {
        &self.store
    }

    /// Index one extracted record, skipping paths that are already stored.
    ///
    /// The skip here is a cheap short-circuit; the at-most-once-per-path
    /// invariant itself is enforced inside the store's `add`, so concurrent
    /// callers racing on the same path cannot double-insert.
    pub async fn index(&self, record: &ContentRecord) -> Result<IndexOutcome> {
        if self.store.already_indexed(&record.path).await? {
            tracing::debug!("{} already indexed, skipping", record.path);
            return Ok(IndexOutcome::skipped("already exists"));
        }

        let texts = [record.embed_text.clone()];
        let embedded = self.embedder.embed_texts(&texts).await?;

        let metadata = EntryMetadata {
            path: record.path.clone(),
            kind: record.kind.as_str().to_string(),
            summary: record.summary.to_json(),
            embed_text: Some(record.embed_text.clone()),
        };
        self.store.add(embedded.embeddings, vec![metadata]).await?;

        tracing::info!("Indexed {}", record.path);
        Ok(IndexOutcome::indexed())
    }

    /// Answer a free-text question from the `top_k` most similar stored
    /// entries.
    ///
    /// The retrieved entries are concatenated into a context block and sent
    /// to the chat provider with a system instruction constraining it to
    /// that context; when nothing is retrieved the block is the
    /// `"<no context>"` placeholder (an empty store is not an error).
    pub async fn answer(&self, query: &str, top_k: usize) -> Result<RagAnswer> {
        let query_vector = self.embedder.embed_text(query).await?;
        let hits = self.store.search(&query_vector, top_k).await?;
        tracing::debug!("Retrieved {} entries for query", hits.len());

        let context = build_context_block(&hits);
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "The following context consists of file data. Use the content to \
                 answer.\n\n{context}\n\nQuestion: {query}"
            )),
        ];

        let completion = self.chat.chat(&messages).await?;
        Ok(RagAnswer {
            answer: completion,
            context_used: hits,
        })
    }
}

/// Concatenate retrieved entries into the context block supplied to the
/// model: a source header per hit, its embed text (or summary when the
/// embed text is absent), blank-line separated.
fn build_context_block(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_CONTEXT_MARKER.to_string();
    }

    hits.iter()
        .map(|hit| {
            let body = match &hit.metadata.embed_text {
                Some(text) if !text.is_empty() => text.clone(),
                _ => hit.metadata.summary.to_string(),
            };
            format!("From file {}:\n{body}", hit.metadata.path)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
