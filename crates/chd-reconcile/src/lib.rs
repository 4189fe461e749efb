//! Schema reconciliation engine.
//!
//! [`prepare_for_model`] turns an uploaded frame with unknown header
//! spelling, units and encodings into the exact feature vector the classifier
//! was trained on, together with a [`ReconciliationReport`] listing every
//! correction. Stages run in a fixed order:
//!
//! 1. [`headers`]: normalize and map headers onto canonical features
//! 2. [`derive`]: fill `age` and `BMI` from raw source columns
//! 3. [`values`]: normalize categorical encodings
//! 4. [`units`]: column-level unit heuristics
//! 5. [`coerce`]: numeric features to nullable `Float64`
//! 6. [`assemble`]: insert missing features, clamp, select
//!
//! [`ReconciliationReport`]: chd_model::ReconciliationReport

pub mod assemble;
pub mod clamp;
pub mod coerce;
pub mod dates;
pub mod derive;
pub mod engine;
pub mod error;
pub mod headers;
pub mod units;
pub mod values;

mod staging;

pub use assemble::ReadyRecordSet;
pub use engine::{ReconcileOptions, prepare_for_model, prepare_for_model_with_options};
pub use error::{ReconcileError, Result};
pub use headers::{HeaderPlan, plan_headers};
