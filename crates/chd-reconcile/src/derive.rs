//! Derived features: `age` from a date of birth, `BMI` from weight and height.
//!
//! A derivation runs only when its target feature is absent after header
//! canonicalization; an uploaded column is never overwritten.

use chd_model::{DERIVATION_SOURCES, ReconciliationReport};
use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsResult};
use tracing::debug;

use crate::dates::{age_in_years, parse_date};
use crate::engine::record_warning;
use crate::headers::HeaderPlan;
use crate::staging::{StagingFrame, numeric_cells, numeric_column, text_cells};

fn source_aliases(source: &str) -> &'static [&'static str] {
    DERIVATION_SOURCES
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Runs every applicable derivation against the staged columns.
pub(crate) fn derive_features(
    raw: &DataFrame,
    plan: &HeaderPlan,
    staging: &mut StagingFrame,
    reference_date: NaiveDate,
    report: &mut ReconciliationReport,
) -> PolarsResult<()> {
    if !staging.contains("age")
        && let Some(source) = plan.find_unmapped(source_aliases("dob"))
    {
        let cells = text_cells(raw.column(source)?);
        if let Some(ages) = ages_from_dob(&cells, reference_date) {
            staging.insert(numeric_column("age", ages));
            record_warning(report, "Derived age from dob");
        } else {
            debug!(source, "no parseable dates of birth, age not derived");
        }
    }

    if !staging.contains("BMI")
        && let Some(weight) = plan.find_unmapped(source_aliases("weight_kg"))
        && let Some(height) = plan.find_unmapped(source_aliases("height_cm"))
    {
        let weights = numeric_cells(raw.column(weight)?);
        let heights = numeric_cells(raw.column(height)?);
        staging.insert(numeric_column("BMI", bmi_values(&weights, &heights)));
        record_warning(report, "Derived BMI from weight_kg and height_cm");
    }
    Ok(())
}

/// Ages for each row, or `None` when not a single date parses.
pub fn ages_from_dob(cells: &[Option<String>], reference: NaiveDate) -> Option<Vec<Option<f64>>> {
    let ages: Vec<Option<f64>> = cells
        .iter()
        .map(|cell| {
            cell.as_deref()
                .and_then(parse_date)
                .map(|dob| age_in_years(dob, reference) as f64)
        })
        .collect();
    if ages.iter().all(Option::is_none) {
        None
    } else {
        Some(ages)
    }
}

/// `weight_kg / (height_cm / 100)^2`; missing when either input is missing or height is not positive.
pub fn bmi_values(weights: &[Option<f64>], heights: &[Option<f64>]) -> Vec<Option<f64>> {
    weights
        .iter()
        .zip(heights)
        .map(|(weight, height)| match (weight, height) {
            (Some(weight), Some(height)) if *height > 0.0 => {
                let meters = height / 100.0;
                Some(weight / (meters * meters))
            }
            _ => None,
        })
        .collect()
}
