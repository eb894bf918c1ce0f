//! Content records: the normalized output of extraction
//!
//! A [`ContentRecord`] is ephemeral: it is produced per extraction call and
//! handed to the indexing flow, which copies its descriptive fields into the
//! vector store. Only `embed_text` (a bounded, derived representation of the
//! file, never the raw content) is ever embedded.

use serde::{Deserialize, Serialize};

/// Tag distinguishing tabular from plain-text sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Tabular,
    Text,
}

impl ContentKind {
    /// The wire/storage form of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Tabular => "tabular",
            ContentKind::Text => "text",
        }
    }
}

/// Summary of one column of a tabular source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Inferred semantic type: `integer`, `float`, `boolean`, `date`, or
    /// `string`
    pub dtype: String,
    /// Count of missing values in the sampled rows
    pub nulls: usize,
    /// Count of distinct non-null values in the sampled rows
    pub unique: usize,
    /// First non-null value among the leading rows, if any
    pub example: Option<serde_json::Value>,
}

/// Summary of a tabular source: shape, per-column detail, and up to five
/// sample rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnSummary>,
    pub samples: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Summary of a plain-text source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSummary {
    /// Character count of the full decoded text (pre-truncation)
    pub n_chars: usize,
    /// Short leading excerpt for operator inspection
    pub preview: String,
}

/// Structured description of a source file, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentSummary {
    Tabular(TabularSummary),
    Text(TextSummary),
}

impl ContentSummary {
    /// The summary as a free-form JSON value, the shape it is persisted in.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Normalized output of extracting one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Source file path; the deduplication key for indexing
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub summary: ContentSummary,
    /// Bounded string distilled from the file; the unit that gets embedded
    pub embed_text: String,
}
