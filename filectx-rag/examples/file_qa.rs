//! Index a directory of files and answer one question about them.
//!
//! Needs a running Ollama with the embedding and chat models pulled:
//!
//! ```text
//! ollama pull nomic-embed-text
//! ollama pull llama3.1:8b
//! cargo run --example file_qa -- ./docs "what do these files say about revenue?"
//! ```

use anyhow::{Context, Result};
use filectx_embed::{EmbedConfig, OllamaEmbedder};
use filectx_rag::{ChatConfig, DEFAULT_TOP_K, OllamaChat, RagEngine};
use filectx_store::{StoreConfig, TinyStore};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let docs_dir: PathBuf = args.next().context("usage: file_qa <dir> <question>")?.into();
    let question = args.next().context("usage: file_qa <dir> <question>")?;

    let store = TinyStore::open(StoreConfig::new(docs_dir.join(".vectorstore"))).await?;
    let engine = RagEngine::new(
        store,
        Arc::new(OllamaEmbedder::new(EmbedConfig::from_env())),
        Arc::new(OllamaChat::new(ChatConfig::from_env())),
    );

    let mut entries = tokio::fs::read_dir(&docs_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match filectx_parser::extract(&entry.path()) {
            Ok(record) => {
                let outcome = engine.index(&record).await?;
                println!(
                    "{} -> {}",
                    record.path,
                    if outcome.indexed { "indexed" } else { "skipped" }
                );
            }
            Err(filectx_parser::ParserError::UnsupportedFormat { extension }) => {
                println!("{} -> unsupported ({extension})", entry.path().display());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let reply = engine.answer(&question, DEFAULT_TOP_K).await?;
    println!("\n{}\n", reply.answer);
    for hit in &reply.context_used {
        println!("  grounded in {} (score {:.3})", hit.metadata.path, hit.score);
    }
    Ok(())
}
