use chd_model::MalformedInputError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
    /// Frame operations on already-validated columns; a failure here is a bug, not bad data.
    #[error("frame operation failed: {0}")]
    Frame(#[from] PolarsError),
}

impl ReconcileError {
    /// True when the caller sent an unusable upload.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
