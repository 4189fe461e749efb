//! Range clamping for numeric features.

use chd_common::format_numeric;
use chd_model::{ClinicalRange, ReconciliationConfig, ReconciliationReport};

use crate::engine::record_warning;
use crate::staging::{StagingFrame, numeric_cells, numeric_column};

/// Outcome of clamping one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampOutcome {
    pub values: Vec<Option<f64>>,
    pub below: usize,
    pub above: usize,
}

/// Clamps present values into `range`, counting how many were moved on each side.
pub fn clamp_values(values: &[Option<f64>], range: ClinicalRange) -> ClampOutcome {
    let mut below = 0;
    let mut above = 0;
    let values = values
        .iter()
        .map(|value| {
            value.map(|v| {
                if v < range.low {
                    below += 1;
                } else if v > range.high {
                    above += 1;
                }
                range.clamp(v)
            })
        })
        .collect();
    ClampOutcome {
        values,
        below,
        above,
    }
}

pub fn clamp_warning(column: &str, range: ClinicalRange, below: usize, above: usize) -> String {
    format!(
        "Clamped {column} outside [{},{}] ({below} low, {above} high).",
        format_numeric(range.low),
        format_numeric(range.high)
    )
}

/// Clamps staged numeric features in canonical order, warning once per clamped column.
pub(crate) fn clamp_ranges(
    staging: &mut StagingFrame,
    config: &ReconciliationConfig,
    report: &mut ReconciliationReport,
) {
    for feature in config.schema().numeric() {
        let feature = feature.name.as_str();
        let Some(range) = config.ranges().get(feature) else {
            continue;
        };
        let Some(column) = staging.get(feature) else {
            continue;
        };
        let outcome = clamp_values(&numeric_cells(column), range);
        if outcome.below == 0 && outcome.above == 0 {
            continue;
        }
        record_warning(
            report,
            clamp_warning(feature, range, outcome.below, outcome.above),
        );
        staging.insert(numeric_column(feature, outcome.values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_both_sides_and_keeps_missing() {
        let range = ClinicalRange::new("age", 0.0, 120.0).unwrap();
        let outcome = clamp_values(&[Some(-5.0), Some(999.0), None, Some(40.0)], range);
        assert_eq!(
            outcome.values,
            vec![Some(0.0), Some(120.0), None, Some(40.0)]
        );
        assert_eq!((outcome.below, outcome.above), (1, 1));
    }

    #[test]
    fn warning_text() {
        let range = ClinicalRange::new("BMI", 10.0, 60.0).unwrap();
        assert_eq!(
            clamp_warning("BMI", range, 0, 2),
            "Clamped BMI outside [10,60] (0 low, 2 high)."
        );
    }
}
