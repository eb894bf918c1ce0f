//! Tabular readers and summarization
//!
//! Delimited, spreadsheet, and JSON-array sources all normalize into the
//! same in-memory [`Table`] before summarization. Reads are bounded at
//! [`MAX_ROWS`](crate::MAX_ROWS) rows so memory and latency stay predictable
//! regardless of input size.

use crate::encoding;
use crate::error::{ParserError, Result};
use crate::record::{ColumnSummary, TabularSummary};
use crate::{MAX_ROWS, SAMPLE_ROWS};
use std::collections::HashSet;
use std::path::Path;

/// A single cell after type sniffing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Int(i) => serde_json::Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }

    /// Sniff a delimited-text field: empty means missing, then integer,
    /// float, and boolean literals, with string as the fallback.
    fn parse(field: &str) -> Self {
        if field.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = field.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            return CellValue::Float(f);
        }
        match field {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(field.to_string()),
        }
    }
}

/// Stand-in for cells missing from short rows.
static NULL_CELL: CellValue = CellValue::Null;

/// Normalized tabular content: named columns over positionally aligned rows.
#[derive(Debug)]
pub(crate) struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Read a delimited file, decoding with a sniffed encoding.
pub(crate) fn read_csv(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    let text = encoding::decode(&bytes).map_err(|message| ParserError::parse(path, message))?;

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let columns = reader
        .headers()
        .map_err(|err| ParserError::parse(path, err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        if rows.len() >= MAX_ROWS {
            tracing::debug!("Row cap reached for {}, truncating read", path.display());
            break;
        }
        let record = record.map_err(|err| ParserError::parse(path, err.to_string()))?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Table { columns, rows })
}

/// Read the first sheet of a spreadsheet, header row first.
pub(crate) fn read_excel(path: &Path) -> Result<Table> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|err| ParserError::parse(path, err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParserError::parse(path, "workbook has no sheets"))?
        .map_err(|err| ParserError::parse(path, err.to_string()))?;

    let mut row_iter = range.rows();
    let Some(header) = row_iter.next() else {
        return Ok(Table {
            columns: Vec::new(),
            rows: Vec::new(),
        });
    };
    let columns = header.iter().map(|cell| cell.to_string()).collect();

    let rows = row_iter
        .take(MAX_ROWS)
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => CellValue::Null,
                    Data::Int(i) => CellValue::Int(*i),
                    // Excel stores integers as floats; undo that where lossless
                    Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        CellValue::Int(*f as i64)
                    }
                    Data::Float(f) => CellValue::Float(*f),
                    Data::Bool(b) => CellValue::Bool(*b),
                    Data::String(s) if s.is_empty() => CellValue::Null,
                    Data::String(s) => CellValue::Text(s.clone()),
                    Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
                    Data::Error(_) => CellValue::Null,
                })
                .collect()
        })
        .collect();

    Ok(Table { columns, rows })
}

/// Read a JSON file: a top-level array becomes rows directly; anything else
/// is tried as JSON-lines first and as a single one-row value last.
pub(crate) fn read_json(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    let text = encoding::decode(&bytes).map_err(|message| ParserError::parse(path, message))?;

    if text.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&text).map_err(|err| ParserError::parse(path, err.to_string()))?;
        return Ok(table_from_json_rows(values));
    }

    let mut lines = Vec::new();
    let mut all_lines_parsed = true;
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        if lines.len() >= MAX_ROWS {
            break;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) => lines.push(value),
            Err(_) => {
                all_lines_parsed = false;
                break;
            }
        }
    }
    if all_lines_parsed && !lines.is_empty() {
        return Ok(table_from_json_rows(lines));
    }

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| ParserError::parse(path, err.to_string()))?;
    Ok(table_from_json_rows(vec![value]))
}

/// Normalize a sequence of JSON values into a table. Object rows share a
/// column set (keys in first-appearance order, missing keys null); any
/// non-object row demotes the whole table to a single `value` column.
fn table_from_json_rows(mut values: Vec<serde_json::Value>) -> Table {
    values.truncate(MAX_ROWS);

    let all_objects = values.iter().all(|value| value.is_object());
    if !all_objects {
        return Table {
            columns: vec!["value".to_string()],
            rows: values
                .into_iter()
                .map(|value| vec![cell_from_json(value)])
                .collect(),
        };
    }

    let mut columns: Vec<String> = Vec::new();
    for value in &values {
        if let serde_json::Value::Object(map) = value {
            for key in map.keys() {
                if !columns.iter().any(|existing| existing == key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let rows = values
        .into_iter()
        .map(|value| {
            let serde_json::Value::Object(mut map) = value else {
                unreachable!("non-object rows handled above");
            };
            columns
                .iter()
                .map(|column| {
                    map.remove(column)
                        .map(cell_from_json)
                        .unwrap_or(CellValue::Null)
                })
                .collect()
        })
        .collect();

    Table { columns, rows }
}

fn cell_from_json(value: serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else {
                CellValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => CellValue::Text(s),
        // Nested structures are kept as their serialized form
        nested => CellValue::Text(nested.to_string()),
    }
}

/// Summarize a table: shape, per-column detail, and leading sample rows.
pub(crate) fn summarize(table: &Table) -> TabularSummary {
    let samples = table
        .rows
        .iter()
        .take(SAMPLE_ROWS)
        .map(|row| {
            let mut map = serde_json::Map::new();
            for (index, name) in table.columns.iter().enumerate() {
                let cell = row.get(index).unwrap_or(&NULL_CELL);
                map.insert(name.clone(), cell.to_json());
            }
            map
        })
        .collect();

    let columns = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let values: Vec<&CellValue> = table
                .rows
                .iter()
                .map(|row| row.get(index).unwrap_or(&NULL_CELL))
                .collect();

            let nulls = values.iter().filter(|value| value.is_null()).count();
            let unique = values
                .iter()
                .filter(|value| !value.is_null())
                .map(|value| value.to_json().to_string())
                .collect::<HashSet<_>>()
                .len();
            let example = values
                .iter()
                .take(SAMPLE_ROWS)
                .find(|value| !value.is_null())
                .map(|value| value.to_json());

            ColumnSummary {
                name: name.clone(),
                dtype: infer_dtype(name, &values),
                nulls,
                unique,
                example,
            }
        })
        .collect();

    TabularSummary {
        n_rows: table.rows.len(),
        n_cols: table.columns.len(),
        columns,
        samples,
    }
}

/// Infer a column's semantic type from its non-null values, with a
/// date-name heuristic for string columns whose name suggests a date.
fn infer_dtype(name: &str, values: &[&CellValue]) -> String {
    let non_null: Vec<&&CellValue> = values.iter().filter(|value| !value.is_null()).collect();
    if non_null.is_empty() {
        return "string".to_string();
    }

    let lowered = name.to_lowercase();
    if (lowered.contains("date") || lowered.contains("time"))
        && non_null
            .iter()
            .all(|value| matches!(value, CellValue::Text(_)))
    {
        return "date".to_string();
    }

    if non_null
        .iter()
        .all(|value| matches!(value, CellValue::Int(_)))
    {
        "integer".to_string()
    } else if non_null
        .iter()
        .all(|value| matches!(value, CellValue::Int(_) | CellValue::Float(_)))
    {
        "float".to_string()
    } else if non_null
        .iter()
        .all(|value| matches!(value, CellValue::Bool(_)))
    {
        "boolean".to_string()
    } else {
        "string".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> Result<std::path::PathBuf> {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(content)?;
        Ok(path)
    }

    #[test]
    fn test_cell_parsing() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("42"), CellValue::Int(42));
        assert_eq!(CellValue::parse("-3.5"), CellValue::Float(-3.5));
        assert_eq!(CellValue::parse("True"), CellValue::Bool(true));
        assert_eq!(
            CellValue::parse("widget"),
            CellValue::Text("widget".to_string())
        );
    }

    #[test]
    fn test_csv_summary() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = write_file(
            temp_dir.path(),
            "orders.csv",
            b"id,amount,city,order_date\n1,9.99,Lisbon,2024-01-01\n2,,Lisbon,2024-01-02\n3,5.00,,2024-01-03\n",
        )?;

        let table = read_csv(&path)?;
        let summary = summarize(&table);

        assert_eq!(summary.n_rows, 3);
        assert_eq!(summary.n_cols, 4);
        assert_eq!(summary.samples.len(), 3);

        let id = &summary.columns[0];
        assert_eq!(id.dtype, "integer");
        assert_eq!(id.nulls, 0);
        assert_eq!(id.unique, 3);
        assert_eq!(id.example, Some(serde_json::json!(1)));

        let amount = &summary.columns[1];
        assert_eq!(amount.dtype, "float");
        assert_eq!(amount.nulls, 1);
        assert_eq!(amount.unique, 2);

        let city = &summary.columns[2];
        assert_eq!(city.dtype, "string");
        assert_eq!(city.nulls, 1);
        assert_eq!(city.unique, 1);

        let order_date = &summary.columns[3];
        assert_eq!(order_date.dtype, "date");
        Ok(())
    }

    #[test]
    fn test_csv_ragged_row_is_parse_error() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = write_file(temp_dir.path(), "bad.csv", b"a,b\n1,2,3\n")?;

        let err = read_csv(&path).unwrap_err();
        assert!(matches!(err, ParserError::Parse { .. }));
        Ok(())
    }

    #[test]
    fn test_csv_read_is_row_bounded() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut content = String::from("id\n");
        for i in 0..10_000 {
            content.push_str(&format!("{i}\n"));
        }
        let path = write_file(temp_dir.path(), "big.csv", content.as_bytes())?;

        let table = read_csv(&path)?;
        assert_eq!(table.rows.len(), MAX_ROWS);
        Ok(())
    }

    #[test]
    fn test_json_array_of_objects() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = write_file(
            temp_dir.path(),
            "rows.json",
            br#"[{"id": 1, "name": "a"}, {"id": 2, "extra": true}]"#,
        )?;

        let table = read_json(&path)?;
        assert_eq!(table.columns, vec!["id", "name", "extra"]);
        assert_eq!(table.rows.len(), 2);
        // Missing keys become nulls
        assert_eq!(table.rows[1][1], CellValue::Null);
        assert_eq!(table.rows[1][2], CellValue::Bool(true));
        Ok(())
    }

    #[test]
    fn test_json_lines() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = write_file(
            temp_dir.path(),
            "rows.json",
            b"{\"id\": 1}\n{\"id\": 2}\n{\"id\": 3}\n",
        )?;

        let table = read_json(&path)?;
        assert_eq!(table.columns, vec!["id"]);
        assert_eq!(table.rows.len(), 3);
        Ok(())
    }

    #[test]
    fn test_json_scalar_array_uses_value_column() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = write_file(temp_dir.path(), "scalars.json", b"[1, 2, 3]")?;

        let table = read_json(&path)?;
        assert_eq!(table.columns, vec!["value"]);
        assert_eq!(table.rows[0], vec![CellValue::Int(1)]);
        Ok(())
    }

    #[test]
    fn test_malformed_json_is_parse_error() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = write_file(temp_dir.path(), "bad.json", b"{\"unterminated\": ")?;

        let err = read_json(&path).unwrap_err();
        assert!(matches!(err, ParserError::Parse { .. }));
        Ok(())
    }

    #[test]
    fn test_all_null_column_defaults_to_string() {
        let table = Table {
            columns: vec!["empty".to_string()],
            rows: vec![vec![CellValue::Null], vec![CellValue::Null]],
        };
        let summary = summarize(&table);
        assert_eq!(summary.columns[0].dtype, "string");
        assert_eq!(summary.columns[0].nulls, 2);
        assert_eq!(summary.columns[0].unique, 0);
        assert_eq!(summary.columns[0].example, None);
    }
}
