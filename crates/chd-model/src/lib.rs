//! CHD risk data model definitions.
//!
//! - **schema**: canonical feature vector and header normalization
//! - **synonyms**: alternate header spellings
//! - **ranges**: clinical plausibility intervals used for clamping
//! - **units**: column-level unit heuristics
//! - **config**: the read-only tables bundled for one process
//! - **report**: per-call reconciliation report

pub mod config;
pub mod error;
pub mod ranges;
pub mod report;
pub mod schema;
pub mod synonyms;
pub mod units;

pub use config::ReconciliationConfig;
pub use error::{MalformedInputError, ModelError, Result};
pub use ranges::{ClinicalRange, RangeTable};
pub use report::ReconciliationReport;
pub use schema::{
    BINARY_FALSE, BINARY_TRUE, CANONICAL_COLUMNS, CanonicalSchema, DERIVATION_SOURCES, FEMALE,
    Feature, FeatureKind, MALE, NO, PASSTHROUGH_COLUMNS, YES, normalize_header,
};
pub use synonyms::SynonymTable;
pub use units::UnitRule;
