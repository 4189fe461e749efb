//! Canonical feature vector consumed by the trained classifier.
//!
//! The order of [`CANONICAL_COLUMNS`] is the order the model was fit on and
//! the order every reconciled frame is emitted in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Canonical feature names in model order.
pub const CANONICAL_COLUMNS: [&str; 14] = [
    "age",
    "gender",
    "sysBP",
    "pulsePressure",
    "BMI",
    "totChol",
    "glucose",
    "heartRate",
    "cigsPerDay",
    "currentSmoker",
    "BPMeds",
    "prevalentStroke",
    "prevalentHyp",
    "diabetes",
];

const NUMERIC_FEATURES: [&str; 8] = [
    "age",
    "sysBP",
    "pulsePressure",
    "BMI",
    "totChol",
    "glucose",
    "heartRate",
    "cigsPerDay",
];

const SEX_FEATURES: [&str; 1] = ["gender"];

/// Identifier columns carried through reconciliation untouched.
pub const PASSTHROUGH_COLUMNS: [&str; 3] = ["id", "patient_id", "name"];

/// Header aliases of the raw columns used to derive `age` and `BMI`.
pub const DERIVATION_SOURCES: [(&str, &[&str]); 3] = [
    ("dob", &["dob", "date_of_birth", "birth_date", "birthdate"]),
    ("weight_kg", &["weight_kg"]),
    ("height_cm", &["height_cm"]),
];

/// Tokens read as an affirmative flag (case-insensitive).
pub const BINARY_TRUE: [&str; 5] = ["yes", "y", "true", "t", "1"];
/// Tokens read as a negative flag (case-insensitive).
pub const BINARY_FALSE: [&str; 5] = ["no", "n", "false", "f", "0"];

pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const MALE: &str = "Male";
pub const FEMALE: &str = "Female";

/// How a feature is represented when handed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Continuous value, coerced to `f64` and optionally range-clamped.
    Numeric,
    /// Categorical with the domain `{"Male", "Female"}`.
    Sex,
    /// Categorical clinical flag with the domain `{"Yes", "No"}`.
    YesNo,
}

impl FeatureKind {
    pub fn is_categorical(self) -> bool {
        !matches!(self, Self::Numeric)
    }

    /// Encoder levels for categorical kinds.
    pub fn levels(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Numeric => None,
            Self::Sex => Some(&[MALE, FEMALE]),
            Self::YesNo => Some(&[YES, NO]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Sex => "sex",
            Self::YesNo => "yes_no",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub kind: FeatureKind,
}

impl Feature {
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered, immutable canonical feature list.
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    features: Vec<Feature>,
    /// Normalized name -> index into `features`.
    lookup: HashMap<String, usize>,
}

impl CanonicalSchema {
    /// Builds a schema, rejecting empty lists and names that collide after normalization.
    pub fn new(features: Vec<Feature>) -> Result<Self> {
        if features.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut lookup = HashMap::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            let key = normalize_header(&feature.name);
            if key.is_empty() || lookup.insert(key, idx).is_some() {
                return Err(ModelError::DuplicateFeature {
                    name: feature.name.clone(),
                });
            }
        }
        Ok(Self { features, lookup })
    }

    /// The Framingham-style feature vector the bundled models are trained on.
    pub fn framingham() -> Self {
        let features = CANONICAL_COLUMNS
            .iter()
            .map(|name| {
                let kind = if NUMERIC_FEATURES.contains(name) {
                    FeatureKind::Numeric
                } else if SEX_FEATURES.contains(name) {
                    FeatureKind::Sex
                } else {
                    FeatureKind::YesNo
                };
                Feature::new(*name, kind)
            })
            .collect::<Vec<_>>();
        let lookup = features
            .iter()
            .enumerate()
            .map(|(idx, feature)| (normalize_header(&feature.name), idx))
            .collect();
        Self { features, lookup }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Exact-name lookup.
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.feature(name).is_some()
    }

    pub fn kind(&self, name: &str) -> Option<FeatureKind> {
        self.feature(name).map(|f| f.kind)
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.kind(name).is_some_and(FeatureKind::is_categorical)
    }

    pub fn numeric(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(|f| f.kind == FeatureKind::Numeric)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.kind.is_categorical())
    }

    /// Resolves an already-normalized header against the canonical names.
    pub fn resolve(&self, normalized: &str) -> Option<&str> {
        self.lookup
            .get(normalized)
            .map(|&idx| self.features[idx].name.as_str())
    }
}

impl Default for CanonicalSchema {
    fn default() -> Self {
        Self::framingham()
    }
}

/// Normalizes a header for lookup: trim, lowercase, separator runs to `_`.
///
/// Whitespace, `_`, `-`, `.` and `/` all count as separators, and a leading
/// byte-order mark is dropped.
///
/// # Examples
///
/// ```
/// use chd_model::normalize_header;
///
/// assert_eq!(normalize_header("  Systolic BP "), "systolic_bp");
/// assert_eq!(normalize_header("sysBP"), "sysbp");
/// assert_eq!(normalize_header("Pulse-Pressure"), "pulse_pressure");
/// assert_eq!(normalize_header("BMI kg/m2"), "bmi_kg_m2");
/// ```
pub fn normalize_header(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.' | '/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
