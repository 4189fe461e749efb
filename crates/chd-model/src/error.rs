use std::path::PathBuf;

use thiserror::Error;

/// Structurally unusable upload: no columns, or content that is not a table.
///
/// Per-value problems never produce this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed input: {reason}")]
pub struct MalformedInputError {
    pub reason: String,
}

impl MalformedInputError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn no_columns() -> Self {
        Self::new("upload has no columns")
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("schema has no features")]
    EmptySchema,

    #[error("duplicate feature in schema: {name}")]
    DuplicateFeature { name: String },

    #[error("unknown feature: {name}")]
    UnknownFeature { name: String },

    #[error("synonym '{alias}' maps to both {first} and {second}")]
    ConflictingSynonym {
        alias: String,
        first: String,
        second: String,
    },

    #[error("invalid range for {feature}: [{low}, {high}]")]
    InvalidRange { feature: String, low: f64, high: f64 },

    #[error("range configured for non-numeric feature: {feature}")]
    RangeOnCategorical { feature: String },

    #[error("invalid unit rule for {column}: {message}")]
    InvalidUnitRule { column: String, message: String },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    TomlInline(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
