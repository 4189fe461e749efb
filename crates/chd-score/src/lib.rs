//! CHD risk scoring.
//!
//! - **bundle**: typed model artifact and logistic scoring
//! - **risk**: risk bands and threshold decisions
//! - **factors**: top contributing features per patient
//! - **patient**: validated single-patient input
//! - **service**: the prediction service and its batch cache
//! - **export**: scored batch CSV output

pub mod bundle;
pub mod cache;
pub mod error;
pub mod export;
pub mod factors;
pub mod patient;
pub mod risk;
pub mod row;
pub mod service;

pub use bundle::{CategoricalTerm, Contribution, ModelBundle, NumericTerm, logistic};
pub use cache::{BATCH_TTL, BatchCache};
pub use error::{Result, ScoreError};
pub use export::write_scored_csv;
pub use factors::{Direction, TopFactor, top_factors};
pub use patient::{PATIENT_LIMITS, PatientInput};
pub use risk::{DEFAULT_THRESHOLD, RISK_LOW_MAX, RISK_MED_MAX, RiskBand, decide};
pub use row::{FeatureRow, FeatureValue};
pub use service::{
    BatchResult, BatchSummary, DEFAULT_TOP_FACTORS, ModelMeta, Prediction, PredictionService,
    ScoredRow,
};
