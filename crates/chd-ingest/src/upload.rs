//! Format dispatch for uploaded files.

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use crate::csv::{CsvOptions, read_csv_bytes_with_options};
use crate::error::{IngestError, Result};
use crate::json::read_json_records;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Tsv,
    Json,
}

impl UploadFormat {
    /// Picks a reader from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err(IngestError::UnsupportedFormat { extension }),
        }
    }
}

/// Reads an upload from disk, choosing the parser by extension.
pub fn read_upload(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let name = path.to_string_lossy();
    let format = UploadFormat::from_file_name(&name)?;
    let span = info_span!("ingest", path = %path.display());
    let _guard = span.enter();
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = bytes.len(), ?format, "read upload");
    read_upload_bytes(format, &bytes)
}

/// Parses upload bytes already held in memory.
pub fn read_upload_bytes(format: UploadFormat, bytes: &[u8]) -> Result<DataFrame> {
    match format {
        UploadFormat::Csv => read_csv_bytes_with_options(bytes, CsvOptions::default()),
        UploadFormat::Tsv => read_csv_bytes_with_options(bytes, CsvOptions::tab_separated()),
        UploadFormat::Json => read_json_records(bytes),
    }
}
