use std::path::PathBuf;

use chd_reconcile::ReconcileError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read model bundle {path}: {source}")]
    BundleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model bundle: {0}")]
    BundleParse(#[from] serde_json::Error),
    #[error("invalid model bundle: {reason}")]
    InvalidBundle { reason: String },
    #[error(
        "model input schema does not match configured features: expected [{}], found [{}]",
        .expected.join(", "),
        .found.join(", ")
    )]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("frame operation failed: {0}")]
    Frame(#[from] PolarsError),
    #[error("failed to write scored rows: {0}")]
    Export(#[from] csv::Error),
}

impl ScoreError {
    pub(crate) fn invalid_bundle(reason: impl Into<String>) -> Self {
        Self::InvalidBundle {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True when the request itself was bad rather than the service.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidField { .. } | Self::InvalidThreshold(_) => true,
            Self::Reconcile(err) => err.is_client_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
