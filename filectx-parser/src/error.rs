//! Error types for document parsing

use std::path::{Path, PathBuf};

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Errors raised while turning a source file into a content record.
///
/// `UnsupportedFormat` and `Parse` are distinct on purpose: the first means
/// the file was never a candidate (unknown extension), the second means the
/// content was there but could not be decoded or structurally interpreted.
/// Callers dispatch on the variant, never on the message text.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Extension outside the supported set
    #[error("file type {extension:?} not supported (supported: csv, json, txt, xls, xlsx)")]
    UnsupportedFormat { extension: String },

    /// Content present but undecodable or structurally unreadable
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// IO errors while reading the source file
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ParserError {
    /// Create a parse error for `path` with a custom message.
    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
