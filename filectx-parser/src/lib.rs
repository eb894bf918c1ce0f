//! # filectx-parser
//!
//! Turns a source file into a normalized [`ContentRecord`]: a structured
//! summary plus a bounded `embed_text` string that downstream components
//! embed and retrieve. The raw file never travels further than this crate,
//! so embedding cost and retrieval context size stay predictable regardless of
//! input size.
//!
//! Tabular sources (`csv`, `json`, `xlsx`, `xls`) are read with a sniffed
//! text encoding, capped at [`MAX_ROWS`] rows, and summarized per column
//! (inferred type, null count, distinct count, example value) with up to
//! five sample rows. Plain-text sources (`txt`) keep a short preview and an
//! embed text capped at [`MAX_EMBED_CHARS`] characters.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! let record = filectx_parser::extract(Path::new("data/orders.csv"))?;
//! println!("{} -> {}", record.path, record.embed_text);
//! # Ok::<(), filectx_parser::ParserError>(())
//! ```

pub mod error;
pub mod extract;
pub mod record;

mod encoding;
mod tabular;

pub use error::{ParserError, Result};
pub use extract::extract;
pub use record::{
    ColumnSummary, ContentKind, ContentRecord, ContentSummary, TabularSummary, TextSummary,
};

/// Extensions the parser accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "json", "txt", "xls", "xlsx"];

/// Upper bound on rows read from a tabular source.
pub const MAX_ROWS: usize = 5_000;

/// Upper bound, in characters, on a plain-text embed text.
pub const MAX_EMBED_CHARS: usize = 8_000;

/// Length of the preview kept in a text summary.
pub const PREVIEW_CHARS: usize = 200;

/// Number of leading rows kept as samples in a tabular summary.
pub const SAMPLE_ROWS: usize = 5;
