use std::collections::BTreeMap;

use chd_common::format_numeric;
use chd_model::{CanonicalSchema, FeatureKind};
use polars::prelude::{DataFrame, PolarsResult};

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Level(String),
}

impl FeatureValue {
    /// Text form used in exported rows.
    pub fn render(&self) -> String {
        match self {
            Self::Number(value) => format_numeric(*value),
            Self::Level(level) => level.clone(),
        }
    }
}

/// Model inputs for one patient. Absent features are missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureRow {
    pub fn set_number(&mut self, feature: &str, value: Option<f64>) {
        match value {
            Some(value) => self
                .values
                .insert(feature.to_string(), FeatureValue::Number(value)),
            None => self.values.remove(feature),
        };
    }

    pub fn set_level(&mut self, feature: &str, level: Option<String>) {
        match level {
            Some(level) => self
                .values
                .insert(feature.to_string(), FeatureValue::Level(level)),
            None => self.values.remove(feature),
        };
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureValue> {
        self.values.get(feature)
    }

    pub fn number(&self, feature: &str) -> Option<f64> {
        match self.values.get(feature) {
            Some(FeatureValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn level(&self, feature: &str) -> Option<&str> {
        match self.values.get(feature) {
            Some(FeatureValue::Level(level)) => Some(level.as_str()),
            _ => None,
        }
    }

    /// Reads row `idx` of a reconciled frame.
    pub fn from_frame(frame: &DataFrame, schema: &CanonicalSchema, idx: usize) -> PolarsResult<Self> {
        let mut row = Self::default();
        for feature in schema.features() {
            let column = frame.column(&feature.name)?;
            match feature.kind {
                FeatureKind::Numeric => row.set_number(&feature.name, column.f64()?.get(idx)),
                FeatureKind::Sex | FeatureKind::YesNo => {
                    row.set_level(&feature.name, column.str()?.get(idx).map(str::to_string));
                }
            }
        }
        Ok(row)
    }
}
