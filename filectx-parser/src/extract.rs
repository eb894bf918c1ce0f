//! Extraction entry point: file path in, content record out

use crate::error::{ParserError, Result};
use crate::record::{ColumnSummary, ContentKind, ContentRecord, ContentSummary, TextSummary};
use crate::tabular;
use crate::{MAX_EMBED_CHARS, PREVIEW_CHARS};
use std::path::Path;

/// Extract a normalized content record from `path`.
///
/// Dispatches on the (case-insensitive) extension: `csv`, `json`, `xlsx`,
/// and `xls` are summarized as tabular data, `txt` as plain text. Anything
/// else fails with [`ParserError::UnsupportedFormat`].
pub fn extract(path: &Path) -> Result<ContentRecord> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    tracing::debug!("Extracting {} ({extension})", path.display());
    match extension.as_str() {
        "csv" | "json" | "xlsx" | "xls" => extract_tabular(path, &extension),
        "txt" => extract_text(path),
        _ => Err(ParserError::UnsupportedFormat { extension }),
    }
}

fn extract_tabular(path: &Path, extension: &str) -> Result<ContentRecord> {
    let table = match extension {
        "csv" => tabular::read_csv(path)?,
        "xlsx" | "xls" => tabular::read_excel(path)?,
        "json" => tabular::read_json(path)?,
        _ => unreachable!("extract() only dispatches tabular extensions here"),
    };
    let summary = tabular::summarize(&table);

    let schema_text = summary
        .columns
        .iter()
        .map(schema_line)
        .collect::<Vec<_>>()
        .join("\n");
    let embed_text = format!(
        "Table with {} rows and {} columns.\n{schema_text}",
        summary.n_rows, summary.n_cols
    );

    Ok(ContentRecord {
        path: path.display().to_string(),
        kind: ContentKind::Tabular,
        summary: ContentSummary::Tabular(summary),
        embed_text,
    })
}

fn extract_text(path: &Path) -> Result<ContentRecord> {
    let bytes = std::fs::read(path)?;
    let text = crate::encoding::decode(&bytes)
        .map_err(|message| ParserError::parse(path, message))?;

    // Bounded derived representation: the embed text carries at most
    // MAX_EMBED_CHARS of the file, the preview far less.
    let truncated: String = text.chars().take(MAX_EMBED_CHARS).collect();
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();

    Ok(ContentRecord {
        path: path.display().to_string(),
        kind: ContentKind::Text,
        summary: ContentSummary::Text(TextSummary {
            n_chars: text.chars().count(),
            preview,
        }),
        embed_text: format!("Document notes:\n{truncated}"),
    })
}

/// One schema line per column, the unit the embed text is built from.
fn schema_line(column: &ColumnSummary) -> String {
    let example = match &column.example {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "null".to_string(),
    };
    format!(
        "{} ({}), nulls={}, unique={} example={example}",
        column.name, column.dtype, column.nulls, column.unique
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_unsupported_extension() {
        let err = extract(Path::new("report.pdf")).unwrap_err();
        assert!(matches!(
            err,
            ParserError::UnsupportedFormat { ref extension } if extension == "pdf"
        ));

        let err = extract(Path::new("no_extension")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_extension_dispatch_is_case_insensitive() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("NOTES.TXT");
        std::fs::write(&path, "upper case extension")?;

        let record = extract(&path)?;
        assert_eq!(record.kind, ContentKind::Text);
        Ok(())
    }

    #[test]
    fn test_text_extraction() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "The warehouse ships on Tuesdays.")?;

        let record = extract(&path)?;
        assert_eq!(record.kind, ContentKind::Text);
        assert_eq!(
            record.embed_text,
            "Document notes:\nThe warehouse ships on Tuesdays."
        );
        match &record.summary {
            ContentSummary::Text(summary) => {
                assert_eq!(summary.n_chars, 32);
                assert_eq!(summary.preview, "The warehouse ships on Tuesdays.");
            }
            other => panic!("expected text summary, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_oversized_text_is_truncated_to_cap() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("big.txt");
        let content = "x".repeat(MAX_EMBED_CHARS + 1_000);
        std::fs::write(&path, &content)?;

        let record = extract(&path)?;
        let body = record
            .embed_text
            .strip_prefix("Document notes:\n")
            .expect("embed text prefix");
        assert_eq!(body.chars().count(), MAX_EMBED_CHARS);

        match &record.summary {
            ContentSummary::Text(summary) => {
                // The summary still reflects the full file
                assert_eq!(summary.n_chars, MAX_EMBED_CHARS + 1_000);
                assert_eq!(summary.preview.chars().count(), PREVIEW_CHARS);
            }
            other => panic!("expected text summary, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_truncation_respects_char_boundaries() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("wide.txt");
        // Multi-byte characters around the cap must not split
        let content = "é".repeat(MAX_EMBED_CHARS + 10);
        std::fs::write(&path, &content)?;

        let record = extract(&path)?;
        let body = record.embed_text.strip_prefix("Document notes:\n").unwrap();
        assert_eq!(body.chars().count(), MAX_EMBED_CHARS);
        assert!(body.chars().all(|c| c == 'é'));
        Ok(())
    }

    #[test]
    fn test_tabular_embed_text_format() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("orders.csv");
        std::fs::write(&path, "id,city\n1,Lisbon\n2,Porto\n")?;

        let record = extract(&path)?;
        assert_eq!(record.kind, ContentKind::Tabular);

        let mut lines = record.embed_text.lines();
        assert_eq!(lines.next(), Some("Table with 2 rows and 2 columns."));
        assert_eq!(
            lines.next(),
            Some("id (integer), nulls=0, unique=2 example=1")
        );
        assert_eq!(
            lines.next(),
            Some("city (string), nulls=0, unique=2 example=Lisbon")
        );
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[test]
    fn test_record_path_matches_input() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("a.txt");
        std::fs::write(&path, "alpha")?;

        let record = extract(&path)?;
        assert_eq!(record.path, path.display().to_string());
        Ok(())
    }
}
