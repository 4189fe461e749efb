//! Clinical plausibility intervals for numeric features.
//!
//! Ranges are used for clamping only. A value outside its range is pulled to
//! the nearest bound, never rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::CanonicalSchema;

const FRAMINGHAM_RANGES: &[(&str, f64, f64)] = &[
    ("age", 0.0, 120.0),
    ("BMI", 10.0, 60.0),
    ("sysBP", 70.0, 300.0),
    ("pulsePressure", 10.0, 200.0),
    ("totChol", 80.0, 400.0),
    ("glucose", 50.0, 500.0),
    ("heartRate", 30.0, 220.0),
    ("cigsPerDay", 0.0, 100.0),
];

/// Inclusive `[low, high]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRange {
    pub low: f64,
    pub high: f64,
}

impl ClinicalRange {
    pub fn new(feature: &str, low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(ModelError::InvalidRange {
                feature: feature.to_string(),
                low,
                high,
            });
        }
        Ok(Self { low, high })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}

/// Numeric feature -> clamping interval.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: BTreeMap<String, ClinicalRange>,
}

impl RangeTable {
    /// Builds a table, rejecting ranges on unknown or categorical features.
    pub fn new<I, S>(entries: I, schema: &CanonicalSchema) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ClinicalRange)>,
        S: AsRef<str>,
    {
        let mut ranges = BTreeMap::new();
        for (name, range) in entries {
            let name = name.as_ref();
            let Some(feature) = schema.feature(name) else {
                return Err(ModelError::UnknownFeature {
                    name: name.to_string(),
                });
            };
            if feature.kind.is_categorical() {
                return Err(ModelError::RangeOnCategorical {
                    feature: name.to_string(),
                });
            }
            let range = ClinicalRange::new(name, range.low, range.high)?;
            ranges.insert(name.to_string(), range);
        }
        Ok(Self { ranges })
    }

    pub fn framingham() -> Self {
        let ranges = FRAMINGHAM_RANGES
            .iter()
            .map(|&(name, low, high)| (name.to_string(), ClinicalRange { low, high }))
            .collect();
        Self { ranges }
    }

    pub fn get(&self, feature: &str) -> Option<ClinicalRange> {
        self.ranges.get(feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ClinicalRange)> {
        self.ranges.iter().map(|(name, range)| (name.as_str(), *range))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
