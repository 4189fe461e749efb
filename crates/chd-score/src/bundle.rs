//! Typed model bundle: declared input schema, threshold and logistic weights.
//!
//! Bundles are produced at training time and stored as JSON:
//!
//! ```json
//! {
//!   "model_version": "lr-demo-1",
//!   "threshold": 0.3,
//!   "input_schema": ["age", "gender"],
//!   "intercept": -2.0,
//!   "numeric": [{"name": "age", "mean": 49.6, "scale": 8.6, "coefficient": 0.55}],
//!   "categorical": [{"name": "gender", "levels": {"Male": 0.45}}]
//! }
//! ```
//!
//! Numeric inputs are standardized with `(x - mean) / scale`; a missing value
//! is imputed with the mean and so contributes nothing. Categorical levels are
//! one-hot: the matching level's coefficient applies, an unknown or missing
//! level contributes nothing.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chd_model::{CanonicalSchema, FeatureKind};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};
use crate::risk::DEFAULT_THRESHOLD;
use crate::row::FeatureRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericTerm {
    pub name: String,
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoricalTerm {
    pub name: String,
    /// Level -> coefficient of its one-hot indicator.
    pub levels: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelBundle {
    pub model_version: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Feature names in the order the model was fit on.
    pub input_schema: Vec<String>,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
}

/// One feature's share of the linear term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub feature: String,
    pub value: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// `1 / (1 + e^-x)`.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl ModelBundle {
    /// Parses and validates a bundle.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(contents)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScoreError::BundleRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Internal consistency: threshold, scales and term names.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScoreError::invalid_bundle(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        if !self.intercept.is_finite() {
            return Err(ScoreError::invalid_bundle("intercept is not finite"));
        }
        let mut declared = HashSet::with_capacity(self.input_schema.len());
        for name in &self.input_schema {
            if !declared.insert(name.as_str()) {
                return Err(ScoreError::invalid_bundle(format!(
                    "'{name}' is listed twice in input_schema"
                )));
            }
        }

        let mut weighted = HashSet::new();
        for term in &self.numeric {
            if !(term.scale.is_finite() && term.scale > 0.0) {
                return Err(ScoreError::invalid_bundle(format!(
                    "scale for '{}' must be positive",
                    term.name
                )));
            }
            if !term.mean.is_finite() || !term.coefficient.is_finite() {
                return Err(ScoreError::invalid_bundle(format!(
                    "weights for '{}' are not finite",
                    term.name
                )));
            }
            check_term_name(&term.name, &declared, &mut weighted)?;
        }
        for term in &self.categorical {
            if term.levels.values().any(|coef| !coef.is_finite()) {
                return Err(ScoreError::invalid_bundle(format!(
                    "weights for '{}' are not finite",
                    term.name
                )));
            }
            check_term_name(&term.name, &declared, &mut weighted)?;
        }
        Ok(())
    }

    /// Requires the declared input schema to be exactly the configured features, with matching kinds.
    pub fn check_schema(&self, schema: &CanonicalSchema) -> Result<()> {
        let expected: Vec<String> = schema.names().map(str::to_string).collect();
        if self.input_schema != expected {
            return Err(ScoreError::SchemaMismatch {
                expected,
                found: self.input_schema.clone(),
            });
        }
        for term in &self.numeric {
            if schema.kind(&term.name) != Some(FeatureKind::Numeric) {
                return Err(ScoreError::invalid_bundle(format!(
                    "'{}' is weighted as numeric but is categorical",
                    term.name
                )));
            }
        }
        for term in &self.categorical {
            if !schema.is_categorical(&term.name) {
                return Err(ScoreError::invalid_bundle(format!(
                    "'{}' is weighted as categorical but is numeric",
                    term.name
                )));
            }
        }
        Ok(())
    }

    /// Per-feature linear contributions, in input-schema order.
    pub fn contributions(&self, row: &FeatureRow) -> Vec<Contribution> {
        self.input_schema
            .iter()
            .map(|name| Contribution {
                feature: name.clone(),
                value: self.contribution(name, row),
            })
            .collect()
    }

    fn contribution(&self, name: &str, row: &FeatureRow) -> f64 {
        if let Some(term) = self.numeric.iter().find(|term| term.name == name) {
            return row
                .number(name)
                .map(|value| term.coefficient * (value - term.mean) / term.scale)
                .unwrap_or(0.0);
        }
        if let Some(term) = self.categorical.iter().find(|term| term.name == name) {
            return row
                .level(name)
                .and_then(|level| term.levels.get(level))
                .copied()
                .unwrap_or(0.0);
        }
        0.0
    }

    pub fn linear_term(&self, contributions: &[Contribution]) -> f64 {
        self.intercept + contributions.iter().map(|c| c.value).sum::<f64>()
    }

    pub fn predict_proba(&self, row: &FeatureRow) -> f64 {
        logistic(self.linear_term(&self.contributions(row)))
    }
}

fn check_term_name<'a>(
    name: &'a str,
    declared: &HashSet<&str>,
    weighted: &mut HashSet<&'a str>,
) -> Result<()> {
    if !declared.contains(name) {
        return Err(ScoreError::invalid_bundle(format!(
            "'{name}' has weights but is not in input_schema"
        )));
    }
    if !weighted.insert(name) {
        return Err(ScoreError::invalid_bundle(format!(
            "'{name}' has more than one weight entry"
        )));
    }
    Ok(())
}
