//! Column-level unit heuristics.

use chd_model::{ReconciliationReport, UnitRule};
use tracing::debug;

use crate::engine::record_warning;
use crate::staging::{StagingFrame, numeric_cells, numeric_column};

/// Median of the present values; even counts average the two middle values.
///
/// # Examples
///
/// ```
/// use chd_reconcile::units::median;
///
/// assert_eq!(median(&[Some(3.0), None, Some(1.0), Some(2.0)]), Some(2.0));
/// assert_eq!(median(&[Some(4.0), Some(1.0)]), Some(2.5));
/// assert_eq!(median(&[None]), None);
/// ```
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Applies each rule whose column is staged and whose median falls in its window.
///
/// A firing rule rescales the whole column; unparseable cells become missing.
pub(crate) fn apply_unit_rules(
    staging: &mut StagingFrame,
    rules: &[UnitRule],
    report: &mut ReconciliationReport,
) {
    for rule in rules {
        let Some(column) = staging.get(&rule.column) else {
            continue;
        };
        let values = numeric_cells(column);
        let Some(median) = median(&values) else {
            continue;
        };
        if !rule.matches_median(median) {
            debug!(column = %rule.column, median, "unit rule not applied");
            continue;
        }
        let converted = values
            .into_iter()
            .map(|value| value.map(|v| v * rule.factor))
            .collect();
        staging.insert(numeric_column(&rule.column, converted));
        record_warning(report, rule.describe());
    }
}
