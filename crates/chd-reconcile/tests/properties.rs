use chd_model::{CANONICAL_COLUMNS, ReconciliationConfig};
use chd_reconcile::{ReconcileOptions, prepare_for_model_with_options};
use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use proptest::prelude::*;

fn options() -> ReconcileOptions {
    ReconcileOptions::with_reference_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
}

fn frame(columns: Vec<(&str, Vec<Option<String>>)>) -> DataFrame {
    DataFrame::new(
        columns
            .into_iter()
            .map(|(name, values)| Column::from(Series::new(name.into(), values)))
            .collect(),
    )
    .unwrap()
}

/// Re-spells a header with random case, padding and separators.
fn respell(name: &str, upper: &[bool], pad: usize, separator: &str) -> String {
    let cased: String = name
        .chars()
        .zip(upper.iter().cycle())
        .map(|(c, up)| {
            if *up {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();
    format!("{}{}{}", " ".repeat(pad), cased, separator)
}

proptest! {
    #[test]
    fn header_spelling_does_not_affect_mapping(
        idx in 0..CANONICAL_COLUMNS.len(),
        upper in prop::collection::vec(any::<bool>(), 1..8),
        pad in 0usize..3,
        separator in prop::sample::select(vec!["", " ", "_", "-"]),
    ) {
        let canonical = CANONICAL_COLUMNS[idx];
        let header = respell(canonical, &upper, pad, separator);
        let raw = frame(vec![(header.as_str(), vec![Some("1".to_string())])]);
        let (_, report) = prepare_for_model_with_options(
            &raw,
            &ReconciliationConfig::framingham(),
            options(),
        )
        .unwrap();
        prop_assert_eq!(report.source_of(canonical), Some(header.as_str()));
        prop_assert!(report.extras_dropped.is_empty());
    }

    #[test]
    fn clamped_values_stay_in_range(values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..40)) {
        let cells = values.iter().map(|v| v.map(|v| v.to_string())).collect();
        let raw = frame(vec![("age", cells), ("sysBP", values.iter().map(|v| v.map(|v| v.to_string())).collect())]);
        let (ready, _) = prepare_for_model_with_options(
            &raw,
            &ReconciliationConfig::framingham(),
            options(),
        )
        .unwrap();
        for (name, low, high) in [("age", 0.0, 120.0), ("sysBP", 70.0, 300.0)] {
            let column = ready.frame().column(name).unwrap().f64().unwrap();
            for (value, input) in column.into_iter().zip(&values) {
                prop_assert_eq!(value.is_some(), input.is_some());
                if let Some(value) = value {
                    prop_assert!((low..=high).contains(&value));
                }
            }
        }
    }

    #[test]
    fn garbage_never_fails_and_columns_are_complete(
        cells in prop::collection::vec(prop::option::of(".{0,12}"), 0..20),
        headers in prop::collection::vec("[A-Za-z _-]{0,10}", 1..5),
    ) {
        let mut columns: Vec<(String, Vec<Option<String>>)> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (format!("{header}#{idx}"), cells.clone()))
            .collect();
        for name in ["age", "sex", "smoker", "totChol", "dob"] {
            columns.push((name.to_string(), cells.clone()));
        }
        let raw = frame(columns.iter().map(|(name, values)| (name.as_str(), values.clone())).collect());
        let (ready, report) = prepare_for_model_with_options(
            &raw,
            &ReconciliationConfig::framingham(),
            options(),
        )
        .unwrap();
        let names: Vec<String> = ready
            .frame()
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        prop_assert_eq!(names, CANONICAL_COLUMNS.to_vec());
        prop_assert_eq!(ready.height(), cells.len());
        prop_assert_eq!(report.extras_dropped.len(), headers.len() + 1);
    }
}
