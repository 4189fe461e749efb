//! Risk banding and threshold decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// Upper bound (exclusive) of the `Low` band.
pub const RISK_LOW_MAX: f64 = 0.33;
/// Upper bound (exclusive) of the `Medium` band.
pub const RISK_MED_MAX: f64 = 0.66;
/// Decision threshold used when neither the caller nor the bundle sets one.
pub const DEFAULT_THRESHOLD: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability < RISK_LOW_MAX {
            Self::Low
        } else if probability < RISK_MED_MAX {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positive when `probability >= threshold`.
pub fn decide(probability: f64, threshold: f64) -> bool {
    probability >= threshold
}

pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ScoreError::InvalidThreshold(threshold))
    }
}

/// Rounds a probability to four decimals for responses.
pub fn round_probability(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 10_000.0
}
