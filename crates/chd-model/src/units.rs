//! Column-level unit heuristics.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::CanonicalSchema;

/// mmol/L -> mg/dL for total cholesterol.
pub const CHOLESTEROL_MMOL_TO_MGDL: f64 = 38.67;

/// Rescales a whole column when its median sits in a window typical of another unit.
///
/// The decision is made once per column: either every value is converted or none is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRule {
    pub column: String,
    pub median_low: f64,
    pub median_high: f64,
    pub factor: f64,
    pub from_unit: String,
    pub to_unit: String,
}

impl UnitRule {
    /// Total cholesterol reported in mmol/L (median 3-15) instead of mg/dL.
    pub fn total_cholesterol() -> Self {
        Self {
            column: "totChol".to_string(),
            median_low: 3.0,
            median_high: 15.0,
            factor: CHOLESTEROL_MMOL_TO_MGDL,
            from_unit: "mmol/L".to_string(),
            to_unit: "mg/dL".to_string(),
        }
    }

    pub fn validate(&self, schema: &CanonicalSchema) -> Result<()> {
        let invalid = |message: &str| ModelError::InvalidUnitRule {
            column: self.column.clone(),
            message: message.to_string(),
        };
        match schema.kind(&self.column) {
            None => {
                return Err(ModelError::UnknownFeature {
                    name: self.column.clone(),
                });
            }
            Some(kind) if kind.is_categorical() => return Err(invalid("column is not numeric")),
            Some(_) => {}
        }
        if !self.median_low.is_finite()
            || !self.median_high.is_finite()
            || self.median_low > self.median_high
        {
            return Err(invalid("median window is empty"));
        }
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(invalid("factor must be positive"));
        }
        Ok(())
    }

    /// True when a column median falls inside the inclusive window.
    pub fn matches_median(&self, median: f64) -> bool {
        median >= self.median_low && median <= self.median_high
    }

    /// Warning text recorded when the rule fires.
    pub fn describe(&self) -> String {
        format!(
            "Converted {} from {} to {} by ×{} (heuristic)",
            self.column, self.from_unit, self.to_unit, self.factor
        )
    }
}
