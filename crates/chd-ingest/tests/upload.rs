use std::fs;

use chd_common::any_to_string;
use chd_ingest::{IngestError, read_csv_bytes, read_json_records, read_upload};
use polars::prelude::{AnyValue, DataFrame};

fn cell(df: &DataFrame, column: &str, idx: usize) -> String {
    any_to_string(df.column(column).unwrap().get(idx).unwrap_or(AnyValue::Null))
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn csv_header_and_rows_are_trimmed() {
    let df = read_csv_bytes(b"\xef\xbb\xbf Sex ,age,notes\nM, 54 ,\nF,61,follow up\n").unwrap();
    assert_eq!(column_names(&df), vec!["Sex", "age", "notes"]);
    assert_eq!(df.height(), 2);
    assert_eq!(cell(&df, "age", 0), "54");
    assert_eq!(cell(&df, "notes", 0), "");
    assert!(df.column("notes").unwrap().get(0).unwrap().is_null());
    assert_eq!(cell(&df, "notes", 1), "follow up");
}

#[test]
fn csv_ragged_rows_are_padded() {
    let df = read_csv_bytes(b"age,sysBP,glucose\n54,130\n\n61,140,90,extra\n").unwrap();
    assert_eq!(df.height(), 2);
    assert!(df.column("glucose").unwrap().get(0).unwrap().is_null());
    assert_eq!(cell(&df, "glucose", 1), "90");
}

#[test]
fn csv_duplicate_headers_get_suffixes() {
    let df = read_csv_bytes(b"age,age,\n1,2,3\n").unwrap();
    assert_eq!(column_names(&df), vec!["age", "age.1", "column_3"]);
}

#[test]
fn csv_empty_upload_is_malformed() {
    let err = read_csv_bytes(b"\n \n").unwrap_err();
    assert!(matches!(err, IngestError::Malformed(_)));
    assert!(err.is_client_error());
}

#[test]
fn csv_invalid_utf8_is_malformed() {
    let err = read_csv_bytes(b"age\n\xff\xfe\n").unwrap_err();
    assert!(matches!(err, IngestError::Malformed(_)));
}

#[test]
fn json_records_union_keys() {
    let df = read_json_records(br#"[{"age": 54, "sex": "M"}, {"age": 61.5, "smoker": true}]"#)
        .unwrap();
    assert_eq!(column_names(&df), vec!["age", "sex", "smoker"]);
    assert_eq!(cell(&df, "age", 1), "61.5");
    assert_eq!(cell(&df, "smoker", 1), "true");
    assert!(df.column("sex").unwrap().get(1).unwrap().is_null());
}

#[test]
fn json_non_array_is_malformed() {
    let err = read_json_records(br#"{"age": 54}"#).unwrap_err();
    assert!(matches!(err, IngestError::Malformed(_)));
    let err = read_json_records(b"[]").unwrap_err();
    assert!(matches!(err, IngestError::Malformed(_)));
    let err = read_json_records(b"not json").unwrap_err();
    assert!(matches!(err, IngestError::Malformed(_)));
}

#[test]
fn read_upload_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("patients.csv");
    fs::write(&csv_path, "id,age\np1,54\n").unwrap();
    let df = read_upload(&csv_path).unwrap();
    assert_eq!(df.shape(), (1, 2));

    let tsv_path = dir.path().join("patients.tsv");
    fs::write(&tsv_path, "id\tage\np1\t54\n").unwrap();
    let df = read_upload(&tsv_path).unwrap();
    assert_eq!(cell(&df, "age", 0), "54");

    let xlsx_path = dir.path().join("patients.xlsx");
    fs::write(&xlsx_path, b"PK").unwrap();
    let err = read_upload(&xlsx_path).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));

    let err = read_upload(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
