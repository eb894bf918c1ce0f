//! Flat on-disk vector store with path-deduplicated appends and linear
//! cosine search.
//!
//! The store persists two companion artifacts under its root directory:
//!
//! - `vectors.bin.gz`: a gzip-compressed, row-major matrix of native-endian
//!   f32 values, one row per entry
//! - `meta.json`: a JSON array of [`EntryMetadata`], positionally aligned
//!   with the matrix (row `i` describes metadata entry `i`)
//!
//! The positional coupling is an invariant: both artifacts are rewritten
//! together on every mutation, and every load validates that their lengths
//! agree (a mismatch is a fatal [`StoreError::Corruption`]).
//!
//! Each operation loads the full dataset, mutates it in memory, and rewrites
//! both artifacts. That caps out at moderate dataset sizes (hundreds to low
//! thousands of entries) and assumes a single writer; concurrent `add` or
//! `clear` calls against the same root can race. Reads interleave safely
//! with reads.

use crate::error::{Result, StoreError};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Default embedding dimension (matches nomic-embed-text).
pub const DEFAULT_DIMENSION: usize = 768;

const VECTORS_FILE: &str = "vectors.bin.gz";
const META_FILE: &str = "meta.json";

/// Configuration for a store instance: where it lives and how wide its
/// vectors are. The dimension is fixed at store creation time.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the two persisted artifacts
    pub root: PathBuf,
    /// Length of every stored vector
    pub dimension: usize,
}

impl StoreConfig {
    /// Create a configuration rooted at `root` with the default dimension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Override the vector dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

/// Descriptive fields persisted alongside each vector.
///
/// This is a copy of the content record's fields with the vector excluded;
/// `type` is the wire tag for `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Source file path; the deduplication key
    pub path: String,
    /// Content tag, `tabular` or `text`
    #[serde(rename = "type")]
    pub kind: String,
    /// Structured summary of the source file
    pub summary: serde_json::Value,
    /// The bounded text that was embedded, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_text: Option<String>,
}

/// One search result: stored metadata annotated with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub metadata: EntryMetadata,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

/// Durable, path-deduplicated vector + metadata storage.
///
/// See the module docs for the persistence format and concurrency caveats.
#[derive(Debug, Clone)]
pub struct TinyStore {
    config: StoreConfig,
}

impl TinyStore {
    /// Open (or create) a store rooted at `config.root`.
    ///
    /// Creates the root directory if missing and validates the persisted
    /// artifacts, so a corrupted store fails here rather than on first use.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.root).await?;
        let store = Self { config };
        let (_, meta) = store.load().await?;
        tracing::debug!(
            "Opened vector store at {} with {} entries",
            store.config.root.display(),
            meta.len()
        );
        Ok(store)
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// The fixed vector dimension of this store.
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// True iff an entry with this `path` exists.
    pub async fn already_indexed(&self, path: &str) -> Result<bool> {
        let (_, meta) = self.load().await?;
        Ok(meta.iter().any(|entry| entry.path == path))
    }

    /// Number of stored entries.
    pub async fn len(&self) -> Result<usize> {
        let (_, meta) = self.load().await?;
        Ok(meta.len())
    }

    /// True iff the store holds no entries.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Append vectors with their metadata, skipping paths that are already
    /// present (first-write-wins; re-adding an existing path is a no-op, not
    /// an update). Returns the number of entries actually appended.
    ///
    /// Fails with [`StoreError::LengthMismatch`] if the two slices differ in
    /// length and [`StoreError::DimensionMismatch`] if any vector does not
    /// match the configured dimension.
    pub async fn add(
        &self,
        vectors: Vec<Vec<f32>>,
        metadatas: Vec<EntryMetadata>,
    ) -> Result<usize> {
        if vectors.len() != metadatas.len() {
            return Err(StoreError::LengthMismatch {
                vectors: vectors.len(),
                metadatas: metadatas.len(),
            });
        }

        let (mut matrix, mut meta) = self.load().await?;

        let mut appended = 0;
        for (vector, metadata) in vectors.into_iter().zip(metadatas) {
            if vector.len() != self.config.dimension {
                return Err(StoreError::DimensionMismatch {
                    expected: self.config.dimension,
                    actual: vector.len(),
                });
            }
            if meta.iter().any(|entry| entry.path == metadata.path) {
                tracing::debug!("Path {} already indexed, skipping", metadata.path);
                continue;
            }
            matrix.extend_from_slice(&vector);
            meta.push(metadata);
            appended += 1;
        }

        if appended == 0 {
            return Ok(0); // nothing new to add
        }

        self.persist(&matrix, &meta).await?;
        tracing::debug!("Appended {appended} entries ({} total)", meta.len());
        Ok(appended)
    }

    /// Return the `top_k` entries most similar to `query`, best first.
    ///
    /// Scores are cosine similarities in [-1, 1]. Ties keep insertion order
    /// (stable sort). An empty store yields an empty result, not an error.
    pub async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let (matrix, meta) = self.load().await?;
        if meta.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.config.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.config.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = matrix
            .chunks_exact(self.config.dimension)
            .map(|row| cosine_similarity(query, row))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let hits = scored
            .into_iter()
            .map(|(index, score)| SearchHit {
                metadata: meta[index].clone(),
                score,
            })
            .collect::<Vec<_>>();
        tracing::debug!("Search returned {} hits", hits.len());
        Ok(hits)
    }

    /// Delete both persisted artifacts. Idempotent: clearing an empty or
    /// never-written store is not an error.
    pub async fn clear(&self) -> Result<()> {
        for file in [self.vectors_path(), self.meta_path()] {
            match tokio::fs::remove_file(&file).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        tracing::info!("Cleared vector store at {}", self.config.root.display());
        Ok(())
    }

    fn vectors_path(&self) -> PathBuf {
        self.config.root.join(VECTORS_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.config.root.join(META_FILE)
    }

    /// Load both artifacts, validating the positional-coupling invariant.
    async fn load(&self) -> Result<(Vec<f32>, Vec<EntryMetadata>)> {
        let vectors_path = self.vectors_path();
        let meta_path = self.meta_path();
        let have_vectors = tokio::fs::try_exists(&vectors_path).await?;
        let have_meta = tokio::fs::try_exists(&meta_path).await?;

        match (have_vectors, have_meta) {
            (false, false) => Ok((Vec::new(), Vec::new())),
            (true, true) => {
                let compressed = tokio::fs::read(&vectors_path).await?;
                let mut raw = Vec::new();
                GzDecoder::new(compressed.as_slice()).read_to_end(&mut raw)?;

                let row_bytes = self.config.dimension * std::mem::size_of::<f32>();
                if row_bytes == 0 || raw.len() % row_bytes != 0 {
                    return Err(StoreError::corruption(
                        &self.config.root,
                        format!(
                            "vector artifact holds {} bytes, not a multiple of the \
                             {row_bytes}-byte row size",
                            raw.len()
                        ),
                    ));
                }
                let matrix: Vec<f32> = bytemuck::pod_collect_to_vec(&raw);

                let meta_bytes = tokio::fs::read(&meta_path).await?;
                let meta: Vec<EntryMetadata> = serde_json::from_slice(&meta_bytes)?;

                let rows = matrix.len() / self.config.dimension;
                if rows != meta.len() {
                    return Err(StoreError::corruption(
                        &self.config.root,
                        format!("{rows} vector rows but {} metadata entries", meta.len()),
                    ));
                }
                Ok((matrix, meta))
            }
            (have_vectors, _) => {
                let (present, missing) = if have_vectors {
                    (VECTORS_FILE, META_FILE)
                } else {
                    (META_FILE, VECTORS_FILE)
                };
                Err(StoreError::corruption(
                    &self.config.root,
                    format!("{present} exists but its companion {missing} is missing"),
                ))
            }
        }
    }

    /// Rewrite both artifacts. Callers must pass a matrix and metadata list
    /// that already satisfy the positional invariant.
    async fn persist(&self, matrix: &[f32], meta: &[EntryMetadata]) -> Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytemuck::cast_slice(matrix))?;
        let compressed = encoder.finish()?;
        tokio::fs::write(self.vectors_path(), compressed).await?;

        let meta_bytes = serde_json::to_vec_pretty(meta)?;
        tokio::fs::write(self.meta_path(), meta_bytes).await?;
        Ok(())
    }
}

/// Cosine similarity between two vectors, 0.0 when either has zero norm or
/// the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
