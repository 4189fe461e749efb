//! Error types for upload ingestion.

use std::path::PathBuf;

use chd_model::MalformedInputError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Upload path does not exist.
    #[error("upload not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the upload from disk.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension names a format no reader exists for.
    #[error("unsupported upload format '{extension}'")]
    UnsupportedFormat { extension: String },

    /// Content cannot be read as a table.
    #[error(transparent)]
    Malformed(#[from] MalformedInputError),

    /// Frame assembly failed after parsing.
    #[error("failed to build frame: {0}")]
    Frame(#[from] PolarsError),
}

impl IngestError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(MalformedInputError::new(reason))
    }

    /// True for failures the caller should report as a rejected upload.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::UnsupportedFormat { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
