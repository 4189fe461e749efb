//! Missing-feature insertion and final column selection.

use chd_model::{CanonicalSchema, FeatureKind, ReconciliationReport};
use polars::prelude::{DataFrame, PolarsResult};

use crate::staging::{StagingFrame, numeric_column, text_column};

/// Reconciled frame: canonical features in canonical order, then passthrough identifiers.
///
/// Numeric features are nullable `Float64`; categorical features are nullable `String`.
#[derive(Debug, Clone)]
pub struct ReadyRecordSet {
    frame: DataFrame,
    feature_columns: Vec<String>,
    passthrough_columns: Vec<String>,
}

impl ReadyRecordSet {
    /// The full frame, passthrough columns included.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Canonical features only, in model order.
    pub fn features(&self) -> PolarsResult<DataFrame> {
        self.frame.select(self.feature_columns.iter().map(String::as_str))
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Passthrough identifier columns present in the upload, in allow-list order.
    pub fn passthrough_columns(&self) -> &[String] {
        &self.passthrough_columns
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Adds an all-null column for each canonical feature the upload did not supply.
pub(crate) fn insert_missing(
    staging: &mut StagingFrame,
    schema: &CanonicalSchema,
    report: &mut ReconciliationReport,
) {
    let height = staging.height();
    for feature in schema.features() {
        if staging.contains(&feature.name) {
            continue;
        }
        let column = match feature.kind {
            FeatureKind::Numeric => numeric_column(&feature.name, vec![None; height]),
            FeatureKind::Sex | FeatureKind::YesNo => text_column(&feature.name, vec![None; height]),
        };
        staging.insert(column);
        report.missing_inserted.push(feature.name.clone());
    }
}

/// Selects canonical features then present passthrough columns.
pub(crate) fn select_ready(
    staging: StagingFrame,
    schema: &CanonicalSchema,
    passthrough: &[String],
) -> PolarsResult<ReadyRecordSet> {
    let feature_columns: Vec<String> = schema.names().map(str::to_string).collect();
    let passthrough_columns: Vec<String> = passthrough
        .iter()
        .filter(|name| staging.contains(name))
        .cloned()
        .collect();
    let order: Vec<String> = feature_columns
        .iter()
        .chain(passthrough_columns.iter())
        .cloned()
        .collect();
    let frame = staging.into_frame(&order)?;
    Ok(ReadyRecordSet {
        frame,
        feature_columns,
        passthrough_columns,
    })
}
