//! CSV reading for uploaded tables.

use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// Reader settings for delimited uploads.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    pub fn tab_separated() -> Self {
        Self { delimiter: b'\t' }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_string()
}

fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads comma-separated bytes: first non-blank row is the header.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    read_csv_bytes_with_options(bytes, CsvOptions::default())
}

pub fn read_csv_bytes_with_options(bytes: &[u8], options: CsvOptions) -> Result<DataFrame> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(bytes);
    let mut table: Option<RawTable> = None;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            IngestError::malformed(format!("could not parse CSV record {}: {err}", idx + 1))
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match table.as_mut() {
            None => {
                let headers = record.iter().map(normalize_header).collect();
                table = Some(RawTable::new(headers));
            }
            Some(table) => table.push_row(record.iter().map(normalize_cell).collect()),
        }
    }
    let Some(table) = table else {
        return Err(IngestError::malformed("upload is empty"));
    };
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed CSV upload"
    );
    table.into_frame()
}
