//! End-to-end pipeline tests: extract → index → search → answer
//!
//! External boundaries are mocked; the parser and store are the real
//! implementations over a temporary directory.

use anyhow::Result;
use async_trait::async_trait;
use filectx_embed::{EmbedError, EmbeddingProvider, EmbeddingResult};
use filectx_rag::{ChatError, ChatMessage, ChatProvider, RagEngine};
use filectx_store::{StoreConfig, TinyStore};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const DIMENSION: usize = 4;

/// Embedder returning canned vectors keyed by exact input text.
struct MockEmbedder {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
}

impl MockEmbedder {
    fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
        }
    }

    fn register(&self, text: &str, vector: Vec<f32>) {
        self.vectors
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed_text(&self, text: &str) -> filectx_embed::Result<Vec<f32>> {
        self.vectors
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .ok_or_else(|| EmbedError::invalid_response(format!("unregistered text: {text}")))
    }

    async fn embed_texts(&self, texts: &[String]) -> filectx_embed::Result<EmbeddingResult> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_text(text).await?);
        }
        Ok(EmbeddingResult::new(embeddings))
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

struct MockChat;

#[async_trait]
impl ChatProvider for MockChat {
    async fn chat(&self, messages: &[ChatMessage]) -> std::result::Result<String, ChatError> {
        // Echo the user prompt so assertions can see what the model saw
        Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
    }
}

fn write_fixtures(dir: &Path) -> Result<()> {
    std::fs::write(
        dir.join("a.txt"),
        "Quarterly review notes: revenue grew eight percent.",
    )?;
    std::fs::write(
        dir.join("b.csv"),
        "order_id,amount\n1,10.50\n2,20.00\n3,5.25\n",
    )?;
    std::fs::write(
        dir.join("c.json"),
        r#"[{"customer": "acme", "active": true}, {"customer": "globex", "active": false}]"#,
    )?;
    Ok(())
}

/// The three-document scenario: index a.txt/b.csv/c.json, check existence,
/// and retrieve the best match for a query aimed at a.txt.
#[tokio::test]
async fn test_three_document_scenario() -> Result<()> {
    let temp_dir = tempdir()?;
    let docs_dir = temp_dir.path().join("docs");
    let store_dir = temp_dir.path().join("vectorstore");
    std::fs::create_dir_all(&docs_dir)?;
    write_fixtures(&docs_dir)?;

    let record_a = filectx_parser::extract(&docs_dir.join("a.txt"))?;
    let record_b = filectx_parser::extract(&docs_dir.join("b.csv"))?;
    let record_c = filectx_parser::extract(&docs_dir.join("c.json"))?;

    // Fixed vectors with known similarities: the query is closest to a.txt.
    let embedder = Arc::new(MockEmbedder::new());
    embedder.register(&record_a.embed_text, vec![1.0, 0.0, 0.0, 0.0]);
    embedder.register(&record_b.embed_text, vec![0.0, 1.0, 0.0, 0.0]);
    embedder.register(&record_c.embed_text, vec![0.0, 0.0, 1.0, 0.0]);
    embedder.register("how did revenue do this quarter?", vec![0.9, 0.3, 0.1, 0.0]);

    let store = TinyStore::open(StoreConfig::new(&store_dir).with_dimension(DIMENSION)).await?;
    let engine = RagEngine::new(
        store,
        Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
        Arc::new(MockChat),
    );

    for record in [&record_a, &record_b, &record_c] {
        let outcome = engine.index(record).await?;
        assert!(outcome.indexed, "first indexing of {} failed", record.path);
    }

    assert!(engine.store().already_indexed(&record_a.path).await?);
    assert!(
        !engine
            .store()
            .already_indexed(&docs_dir.join("d.txt").display().to_string())
            .await?
    );

    let reply = engine.answer("how did revenue do this quarter?", 1).await?;
    assert_eq!(reply.context_used.len(), 1);
    assert_eq!(reply.context_used[0].metadata.path, record_a.path);
    assert!(reply.answer.contains("revenue grew eight percent"));

    // Highest-scoring entry among the three
    let all = engine.answer("how did revenue do this quarter?", 3).await?;
    assert_eq!(all.context_used.len(), 3);
    assert_eq!(all.context_used[0].metadata.path, record_a.path);
    assert!(all.context_used[0].score > all.context_used[1].score);
    Ok(())
}

/// Re-indexing an unchanged file is a no-op visible to the caller.
#[tokio::test]
async fn test_reindex_is_skipped() -> Result<()> {
    let temp_dir = tempdir()?;
    let docs_dir = temp_dir.path().join("docs");
    std::fs::create_dir_all(&docs_dir)?;
    std::fs::write(docs_dir.join("a.txt"), "alpha")?;

    let record = filectx_parser::extract(&docs_dir.join("a.txt"))?;
    let embedder = Arc::new(MockEmbedder::new());
    embedder.register(&record.embed_text, vec![1.0, 0.0, 0.0, 0.0]);

    let store = TinyStore::open(
        StoreConfig::new(temp_dir.path().join("vectorstore")).with_dimension(DIMENSION),
    )
    .await?;
    let engine = RagEngine::new(
        store,
        Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
        Arc::new(MockChat),
    );

    assert!(engine.index(&record).await?.indexed);
    let second = engine.index(&record).await?;
    assert!(!second.indexed);
    assert_eq!(second.reason.as_deref(), Some("already exists"));
    assert_eq!(engine.store().len().await?, 1);
    Ok(())
}

/// The store round-trips across engine instances: a new engine over the
/// same directory sees everything the previous one indexed.
#[tokio::test]
async fn test_store_survives_engine_restart() -> Result<()> {
    let temp_dir = tempdir()?;
    let docs_dir = temp_dir.path().join("docs");
    let store_dir = temp_dir.path().join("vectorstore");
    std::fs::create_dir_all(&docs_dir)?;
    std::fs::write(docs_dir.join("a.txt"), "persistent knowledge")?;

    let record = filectx_parser::extract(&docs_dir.join("a.txt"))?;
    let embedder = Arc::new(MockEmbedder::new());
    embedder.register(&record.embed_text, vec![0.5, 0.5, 0.0, 0.0]);
    embedder.register("query", vec![0.5, 0.5, 0.0, 0.0]);

    {
        let store =
            TinyStore::open(StoreConfig::new(&store_dir).with_dimension(DIMENSION)).await?;
        let engine = RagEngine::new(
            store,
            Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
            Arc::new(MockChat),
        );
        engine.index(&record).await?;
    }

    let store = TinyStore::open(StoreConfig::new(&store_dir).with_dimension(DIMENSION)).await?;
    let engine = RagEngine::new(
        store,
        Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
        Arc::new(MockChat),
    );

    assert!(engine.store().already_indexed(&record.path).await?);
    let reply = engine.answer("query", 1).await?;
    assert_eq!(reply.context_used[0].metadata.path, record.path);
    assert!((reply.context_used[0].score - 1.0).abs() < 1e-6);

    // And clearing drops it all
    engine.store().clear().await?;
    assert!(!engine.store().already_indexed(&record.path).await?);
    assert!(engine.answer("query", 1).await?.context_used.is_empty());
    Ok(())
}
