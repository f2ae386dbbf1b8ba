//! Tabular record import.
//!
//! Every cell becomes a string; empty cells and JSON nulls become blank
//! values so the missing-field check treats them as absent.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use formfill_core::Record;
use serde_json::Value;
use tracing::info;

use crate::StoreError;

fn source_error(path: &Path, reason: impl ToString) -> StoreError {
    StoreError::SourceData {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read records from a `.csv` or `.json` file, chosen by extension.
pub fn read_records(path: &Path) -> Result<Vec<Record>, StoreError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let records = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("json") => read_json(path)?,
        _ => return Err(StoreError::UnsupportedSource(path.to_path_buf())),
    };
    info!(path = %path.display(), count = records.len(), "imported records");
    Ok(records)
}

/// CSV with a header row. Short rows leave trailing fields blank.
pub fn read_csv(path: &Path) -> Result<Vec<Record>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| source_error(path, e))?;

    let headers = reader.headers().map_err(|e| source_error(path, e))?.clone();
    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| source_error(path, format!("row {}: {e}", idx + 2)))?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(col, name)| (name, row.get(col).unwrap_or("")))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// A JSON array of flat objects. Numbers and booleans are stringified;
/// keys keep their order in the file.
pub fn read_json(path: &Path) -> Result<Vec<Record>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| source_error(path, e))?;

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            row.into_iter()
                .map(|(name, value)| {
                    let text = match value {
                        Value::Null => String::new(),
                        Value::String(s) => s,
                        Value::Bool(b) => b.to_string(),
                        Value::Number(n) => n.to_string(),
                        Value::Array(_) | Value::Object(_) => {
                            return Err(source_error(
                                path,
                                format!("row {}: field {name:?} is not a scalar", idx + 1),
                            ));
                        }
                    };
                    Ok((name, text))
                })
                .collect::<Result<Record, StoreError>>()
        })
        .collect()
}
