//! File-level operations behind the `chd` subcommands.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{info, info_span, trace};

use chd_ingest::read_upload;
use chd_model::{ReconciliationConfig, ReconciliationReport};
use chd_reconcile::{ReadyRecordSet, prepare_for_model};
use chd_score::{BatchResult, PatientInput, PredictionService, write_scored_csv};

use crate::logging::redact_value;

/// Built-in tables unless a TOML file is given.
pub fn load_config(path: Option<&Path>) -> Result<ReconciliationConfig> {
    match path {
        Some(path) => ReconciliationConfig::load(path)
            .with_context(|| format!("load reconciliation config {}", path.display())),
        None => Ok(ReconciliationConfig::framingham()),
    }
}

pub fn reconcile_file(
    path: &Path,
    config: &ReconciliationConfig,
) -> Result<(ReadyRecordSet, ReconciliationReport)> {
    let raw = read_upload(path).with_context(|| format!("read upload {}", path.display()))?;
    let (ready, report) =
        prepare_for_model(&raw, config).with_context(|| format!("reconcile {}", path.display()))?;
    info!(
        rows = ready.height(),
        dropped = report.extras_dropped.len(),
        inserted = report.missing_inserted.len(),
        warnings = report.warnings.len(),
        "reconciled upload"
    );
    Ok((ready, report))
}

pub fn write_frame_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut frame = frame.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn load_service(
    model: &Path,
    config: ReconciliationConfig,
    top_factors: usize,
) -> Result<PredictionService> {
    let service = PredictionService::load(model, Arc::new(config))
        .with_context(|| format!("load model bundle {}", model.display()))?;
    Ok(service.with_top_factors(top_factors))
}

pub fn read_patient(path: &Path) -> Result<PatientInput> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse patient {}", path.display()))
}

/// Reconciles and scores an upload, returning the cached batch.
pub fn score_file(
    service: &PredictionService,
    path: &Path,
    threshold: Option<f64>,
) -> Result<Arc<BatchResult>> {
    let span = info_span!("score", file = %path.display());
    let _guard = span.enter();
    let raw = read_upload(path).with_context(|| format!("read upload {}", path.display()))?;
    let summary = service
        .score_batch(&raw, threshold)
        .with_context(|| format!("score {}", path.display()))?;
    let batch = service
        .batch(&summary.batch_id)
        .ok_or_else(|| anyhow!("batch {} expired before it was read", summary.batch_id))?;
    for (idx, row) in batch.rows.iter().enumerate() {
        let id = row
            .passthrough
            .first()
            .and_then(Option::as_deref)
            .unwrap_or("-");
        trace!(
            row = idx,
            id = redact_value(id),
            probability = row.probability,
            band = %row.risk_band,
            "scored row"
        );
    }
    info!(
        batch_id = %summary.batch_id,
        rows = summary.rows,
        positives = summary.positives,
        threshold = summary.threshold,
        "scored upload"
    );
    Ok(batch)
}

pub fn write_scored(batch: &BatchResult, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_scored_csv(batch, file).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
