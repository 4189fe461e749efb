//! Reconciliation entry points.

use chd_model::{MalformedInputError, ReconciliationConfig, ReconciliationReport};
use chrono::{Local, NaiveDate};
use polars::prelude::DataFrame;
use tracing::{debug, info_span, warn};

use crate::assemble::{ReadyRecordSet, insert_missing, select_ready};
use crate::clamp::clamp_ranges;
use crate::coerce::coerce_numeric;
use crate::derive::derive_features;
use crate::error::Result;
use crate::headers::{plan_headers, stage_columns};
use crate::units::apply_unit_rules;
use crate::values::normalize_categoricals;

/// Per-call knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Date ages are computed against; today when unset.
    pub reference_date: Option<NaiveDate>,
}

impl ReconcileOptions {
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self {
            reference_date: Some(reference_date),
        }
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Appends a correction notice to the report and logs it.
pub(crate) fn record_warning(report: &mut ReconciliationReport, message: impl Into<String>) {
    let message = message.into();
    warn!(correction = %message, "reconciliation correction");
    report.warn(message);
}

/// Aligns an uploaded frame to the canonical feature vector.
///
/// Equivalent to [`prepare_for_model_with_options`] with default options.
pub fn prepare_for_model(
    raw: &DataFrame,
    config: &ReconciliationConfig,
) -> Result<(ReadyRecordSet, ReconciliationReport)> {
    prepare_for_model_with_options(raw, config, ReconcileOptions::default())
}

/// Aligns an uploaded frame to the canonical feature vector.
///
/// Per-value problems never fail the call: they become missing values,
/// pass-through values or report warnings. The only client error is an
/// upload with no columns.
///
/// # Errors
///
/// [`ReconcileError::MalformedInput`](crate::ReconcileError::MalformedInput)
/// when `raw` has no columns.
pub fn prepare_for_model_with_options(
    raw: &DataFrame,
    config: &ReconciliationConfig,
    options: ReconcileOptions,
) -> Result<(ReadyRecordSet, ReconciliationReport)> {
    if raw.width() == 0 {
        return Err(MalformedInputError::no_columns().into());
    }
    let span = info_span!("reconcile", rows = raw.height(), columns = raw.width());
    let _guard = span.enter();

    let mut report = ReconciliationReport::new();
    let headers: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let plan = plan_headers(&headers, config, &mut report);
    let mut staging = stage_columns(raw, &plan)?;
    derive_features(
        raw,
        &plan,
        &mut staging,
        options.reference_date(),
        &mut report,
    )?;
    normalize_categoricals(&mut staging, config.schema());
    apply_unit_rules(&mut staging, config.unit_rules(), &mut report);
    coerce_numeric(&mut staging, config.schema());
    insert_missing(&mut staging, config.schema(), &mut report);
    clamp_ranges(&mut staging, config, &mut report);
    let ready = select_ready(staging, config.schema(), config.passthrough())?;

    debug!(
        mapped = report.mapping_summary.len(),
        dropped = report.extras_dropped.len(),
        inserted = report.missing_inserted.len(),
        warnings = report.warnings.len(),
        "reconciled upload"
    );
    Ok((ready, report))
}
