//! Read-only reconciliation tables, loaded once per process.
//!
//! The built-in [`ReconciliationConfig::framingham`] matches the bundled
//! models. A TOML file can replace it:
//!
//! ```toml
//! passthrough = ["id", "patient_id", "name"]
//!
//! [[features]]
//! name = "age"
//! kind = "numeric"
//! range = [0, 120]
//!
//! [[features]]
//! name = "gender"
//! kind = "sex"
//!
//! [synonyms]
//! sex = "gender"
//!
//! [[unit_rules]]
//! column = "totChol"
//! median_low = 3.0
//! median_high = 15.0
//! factor = 38.67
//! from_unit = "mmol/L"
//! to_unit = "mg/dL"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ModelError, Result};
use crate::ranges::{ClinicalRange, RangeTable};
use crate::schema::{CanonicalSchema, Feature, FeatureKind, PASSTHROUGH_COLUMNS, normalize_header};
use crate::synonyms::SynonymTable;
use crate::units::UnitRule;

/// Canonical schema plus every table the reconciliation engine reads.
#[derive(Debug, Clone)]
pub struct ReconciliationConfig {
    schema: CanonicalSchema,
    synonyms: SynonymTable,
    ranges: RangeTable,
    unit_rules: Vec<UnitRule>,
    passthrough: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    features: Vec<FeatureEntry>,
    #[serde(default)]
    synonyms: BTreeMap<String, String>,
    #[serde(default)]
    unit_rules: Vec<UnitRule>,
    #[serde(default = "default_passthrough")]
    passthrough: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeatureEntry {
    name: String,
    kind: FeatureKind,
    #[serde(default)]
    range: Option<[f64; 2]>,
}

fn default_passthrough() -> Vec<String> {
    PASSTHROUGH_COLUMNS.iter().map(|s| (*s).to_string()).collect()
}

impl ReconciliationConfig {
    /// Assembles a config from validated parts.
    pub fn new(
        schema: CanonicalSchema,
        synonyms: SynonymTable,
        ranges: RangeTable,
        unit_rules: Vec<UnitRule>,
        passthrough: Vec<String>,
    ) -> Result<Self> {
        for rule in &unit_rules {
            rule.validate(&schema)?;
        }
        let mut normalized_passthrough = Vec::with_capacity(passthrough.len());
        for name in passthrough {
            let key = normalize_header(&name);
            if schema.resolve(&key).is_some() || normalized_passthrough.contains(&key) {
                return Err(ModelError::DuplicateFeature { name });
            }
            normalized_passthrough.push(key);
        }
        Ok(Self {
            schema,
            synonyms,
            ranges,
            unit_rules,
            passthrough: normalized_passthrough,
        })
    }

    /// Framingham schema, synonyms, ranges and the cholesterol unit rule.
    pub fn framingham() -> Self {
        Self {
            schema: CanonicalSchema::framingham(),
            synonyms: SynonymTable::framingham(),
            ranges: RangeTable::framingham(),
            unit_rules: vec![UnitRule::total_cholesterol()],
            passthrough: default_passthrough(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Self::from_file(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|source| ModelError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let mut features = Vec::with_capacity(file.features.len());
        let mut ranges = Vec::new();
        for entry in file.features {
            if let Some([low, high]) = entry.range {
                ranges.push((entry.name.clone(), ClinicalRange::new(&entry.name, low, high)?));
            }
            features.push(Feature::new(entry.name, entry.kind));
        }
        let schema = CanonicalSchema::new(features)?;
        let synonyms = SynonymTable::new(file.synonyms, &schema)?;
        let ranges = RangeTable::new(ranges, &schema)?;
        Self::new(schema, synonyms, ranges, file.unit_rules, file.passthrough)
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    pub fn unit_rules(&self) -> &[UnitRule] {
        &self.unit_rules
    }

    /// Normalized passthrough identifier names, in output order.
    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// Resolves a raw header: canonical names first, then synonyms.
    pub fn resolve_header(&self, raw: &str) -> Option<&str> {
        let normalized = normalize_header(raw);
        self.schema
            .resolve(&normalized)
            .or_else(|| self.synonyms.get(&normalized))
    }
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self::framingham()
    }
}
