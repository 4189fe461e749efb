use std::fs;

use chd_model::{
    CANONICAL_COLUMNS, ClinicalRange, FeatureKind, ModelError, ReconciliationConfig,
    normalize_header,
};

const SMALL_CONFIG: &str = r#"
passthrough = ["record_id"]

[[features]]
name = "age"
kind = "numeric"
range = [18, 99]

[[features]]
name = "sex"
kind = "sex"

[[features]]
name = "ldl"
kind = "numeric"

[synonyms]
"Age (years)" = "age"
gender = "sex"

[[unit_rules]]
column = "ldl"
median_low = 1.0
median_high = 8.0
factor = 38.67
from_unit = "mmol/L"
to_unit = "mg/dL"
"#;

#[test]
fn framingham_default_resolves_every_synonym_and_name() {
    let config = ReconciliationConfig::default();
    for name in CANONICAL_COLUMNS {
        assert_eq!(config.resolve_header(name), Some(name));
        assert_eq!(config.resolve_header(&name.to_uppercase()), Some(name));
    }
    assert_eq!(config.resolve_header("Sex"), Some("gender"));
    assert_eq!(config.resolve_header("Total Cholesterol"), Some("totChol"));
    assert_eq!(config.resolve_header("BP-Meds"), Some("BPMeds"));
    assert_eq!(config.resolve_header("notes"), None);
    assert_eq!(config.unit_rules().len(), 1);
    assert_eq!(config.passthrough(), ["id", "patient_id", "name"]);
}

#[test]
fn toml_config_builds_all_tables() {
    let config = ReconciliationConfig::from_toml_str(SMALL_CONFIG).unwrap();
    let names: Vec<&str> = config.schema().names().collect();
    assert_eq!(names, vec!["age", "sex", "ldl"]);
    assert_eq!(config.schema().kind("sex"), Some(FeatureKind::Sex));
    assert_eq!(
        config.ranges().get("age"),
        Some(ClinicalRange {
            low: 18.0,
            high: 99.0
        })
    );
    assert_eq!(config.ranges().get("ldl"), None);
    assert_eq!(config.synonyms().get(&normalize_header("Age (years)")), Some("age"));
    assert_eq!(config.resolve_header("GENDER"), Some("sex"));
    assert_eq!(config.unit_rules()[0].column, "ldl");
    assert_eq!(config.passthrough(), ["record_id"]);
}

#[test]
fn toml_config_rejects_synonym_to_unknown_feature() {
    let contents = r#"
[[features]]
name = "age"
kind = "numeric"

[synonyms]
years = "age_years"
"#;
    let err = ReconciliationConfig::from_toml_str(contents).unwrap_err();
    assert!(matches!(err, ModelError::UnknownFeature { name } if name == "age_years"));
}

#[test]
fn toml_config_rejects_range_on_categorical() {
    let contents = r#"
[[features]]
name = "smoker"
kind = "yes_no"
range = [0, 1]
"#;
    let err = ReconciliationConfig::from_toml_str(contents).unwrap_err();
    assert!(matches!(err, ModelError::RangeOnCategorical { .. }));
}

#[test]
fn toml_config_rejects_passthrough_shadowing_feature() {
    let contents = r#"
passthrough = ["Age"]

[[features]]
name = "age"
kind = "numeric"
"#;
    let err = ReconciliationConfig::from_toml_str(contents).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateFeature { .. }));
}

#[test]
fn toml_config_reports_parse_errors() {
    let err = ReconciliationConfig::from_toml_str("features = 3").unwrap_err();
    assert!(matches!(err, ModelError::TomlInline(_)));
}

#[test]
fn load_reads_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.toml");
    fs::write(&path, SMALL_CONFIG).unwrap();
    let config = ReconciliationConfig::load(&path).unwrap();
    assert_eq!(config.schema().len(), 3);

    let missing = dir.path().join("missing.toml");
    let err = ReconciliationConfig::load(&missing).unwrap_err();
    assert!(matches!(err, ModelError::Io { .. }));
}
