use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chd_ingest::read_csv_bytes;
use chd_model::{CANONICAL_COLUMNS, ReconciliationConfig};
use chd_score::{
    BatchCache, Direction, ModelBundle, PatientInput, PredictionService, RiskBand, ScoreError,
    write_scored_csv,
};
use polars::prelude::DataFrame;

fn bundle_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bundle.json")
}

fn service() -> PredictionService {
    PredictionService::load(&bundle_path(), Arc::new(ReconciliationConfig::framingham())).unwrap()
}

fn patient(json: &str) -> PatientInput {
    serde_json::from_str(json).unwrap()
}

#[test]
fn meta_reports_declared_schema() {
    let meta = service().meta();
    assert_eq!(meta.expected_columns, CANONICAL_COLUMNS.to_vec());
    assert_eq!(meta.threshold, 0.3);
    assert_eq!(meta.model_version, "framingham-lr-demo-1");
}

#[test]
fn average_patient_is_low_risk() {
    let input = patient(
        r#"{"age": 49.6, "gender": "Female", "sysBP": 132.4, "BMI": 25.8,
            "currentSmoker": "No", "diabetes": "no"}"#,
    );
    let prediction = service().predict(&input).unwrap();
    assert_eq!(prediction.probability, 0.1246);
    assert_eq!(prediction.prediction, 0);
    assert_eq!(prediction.risk_band, RiskBand::Low);
    assert!(prediction.top_factors.is_empty());
}

#[test]
fn older_hypertensive_patient_is_high_risk() {
    let input = patient(
        r#"{"age": 70, "gender": "M", "sysBP": 180, "BMI": 25.8, "cigsPerDay": 20,
            "prevalentHyp": "Yes", "diabetes": "1"}"#,
    );
    let prediction = service().predict(&input).unwrap();
    assert_eq!(prediction.probability, 0.7644);
    assert_eq!(prediction.prediction, 1);
    assert_eq!(prediction.risk_band, RiskBand::High);
    let features: Vec<&str> = prediction
        .top_factors
        .iter()
        .map(|factor| factor.feature.as_str())
        .collect();
    assert_eq!(features, vec!["age", "sysBP", "gender"]);
    assert_eq!(prediction.top_factors[0].direction, Direction::RaisesRisk);
}

#[test]
fn invalid_patient_is_a_client_error() {
    let input = patient(r#"{"age": 12, "gender": "Male", "sysBP": 120, "BMI": 22}"#);
    let err = service().predict(&input).unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn mismatched_bundle_schema_is_rejected() {
    let contents = std::fs::read_to_string(bundle_path()).unwrap();
    let mut bundle = ModelBundle::from_json_str(&contents).unwrap();
    bundle.input_schema.swap(0, 1);
    let err =
        PredictionService::new(bundle, Arc::new(ReconciliationConfig::framingham())).unwrap_err();
    assert!(matches!(err, ScoreError::SchemaMismatch { .. }));
}

#[test]
fn missing_bundle_file_is_reported_with_path() {
    let err = ModelBundle::load(&PathBuf::from("/nonexistent/bundle.json")).unwrap_err();
    assert!(matches!(err, ScoreError::BundleRead { .. }));
    assert!(err.to_string().contains("/nonexistent/bundle.json"));
}

#[test]
fn score_batch_caches_rows_and_exports_csv() {
    let service = service();
    let raw = read_csv_bytes(
        b"Patient ID,Age,Sex,SBP,BMI,diabetes,notes\n\
          p1,70,M,180,25.8,yes,x\n\
          p2,40,F,115,22,no,y\n",
    )
    .unwrap();
    let summary = service.score_batch(&raw, None).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.positives, 1);
    assert_eq!(summary.threshold, 0.3);
    assert_eq!(summary.report.extras_dropped, vec!["notes"]);

    let batch = service.batch(&summary.batch_id).unwrap();
    assert_eq!(batch.batch_id, summary.batch_id);
    assert_eq!(batch.passthrough_columns, vec!["patient_id"]);
    assert!(batch.rows[0].prediction);
    assert_eq!(batch.rows[0].passthrough, vec![Some("p1".to_string())]);
    assert_eq!(batch.rows[1].risk_band, RiskBand::Low);

    let mut out = Vec::new();
    write_scored_csv(&batch, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("patient_id,age,gender,sysBP"));
    assert!(header.ends_with("diabetes,proba,pred@thr,risk_band"));
    let first = lines.next().unwrap();
    assert!(first.starts_with("p1,70,Male,180,,25.8,"));
    assert!(first.ends_with(",1,High"));
    assert_eq!(lines.count(), 1);
}

#[test]
fn threshold_override_applies_to_batch() {
    let service = service();
    let raw = read_csv_bytes(b"age,sex\n40,F\n45,M\n").unwrap();
    let summary = service.score_batch(&raw, Some(0.0)).unwrap();
    assert_eq!(summary.positives, 2);

    let err = service.score_batch(&raw, Some(1.5)).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidThreshold(_)));
    assert!(err.is_client_error());
}

#[test]
fn expired_batches_are_gone() {
    let service = service().with_cache(BatchCache::with_ttl(Duration::ZERO));
    let raw = read_csv_bytes(b"age\n50\n").unwrap();
    let summary = service.score_batch(&raw, None).unwrap();
    assert!(service.batch(&summary.batch_id).is_none());
}

#[test]
fn empty_upload_is_a_client_error() {
    let err = service().score_batch(&DataFrame::empty(), None).unwrap_err();
    assert!(matches!(err, ScoreError::Reconcile(_)));
    assert!(err.is_client_error());
}
