//! JSON records ingestion: an array of flat objects, one per row.

use polars::prelude::DataFrame;
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::table::RawTable;

fn cell_text(column: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(IngestError::malformed(format!(
            "nested value in column '{column}'"
        ))),
    }
}

/// Reads `[{"age": 54, "sex": "M"}, ...]` into a raw frame.
///
/// Columns are the union of keys in first-seen order; absent keys are null.
pub fn read_json_records(bytes: &[u8]) -> Result<DataFrame> {
    let parsed: Value = serde_json::from_slice(bytes)
        .map_err(|err| IngestError::malformed(format!("could not parse JSON: {err}")))?;
    let Value::Array(records) = parsed else {
        return Err(IngestError::malformed("expected a JSON array of records"));
    };

    let mut headers: Vec<String> = Vec::new();
    for record in &records {
        let Value::Object(fields) = record else {
            return Err(IngestError::malformed("every JSON record must be an object"));
        };
        for key in fields.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut table = RawTable::new(headers);
    for record in &records {
        let Value::Object(fields) = record else {
            continue;
        };
        let mut row = Vec::with_capacity(table.headers.len());
        for header in &table.headers {
            let cell = match fields.get(header) {
                Some(value) => cell_text(header, value)?,
                None => None,
            };
            row.push(cell);
        }
        table.push_row(row);
    }
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed JSON upload"
    );
    table.into_frame()
}
