//! Prediction service: model bundle and reconciliation config, loaded once and read-only after.

use std::path::Path;
use std::sync::Arc;

use chd_common::any_to_string_opt;
use chd_model::{ReconciliationConfig, ReconciliationReport};
use chd_reconcile::{ReadyRecordSet, prepare_for_model};
use polars::prelude::{AnyValue, DataFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::bundle::{ModelBundle, logistic};
use crate::cache::BatchCache;
use crate::error::Result;
use crate::factors::{TopFactor, top_factors};
use crate::patient::PatientInput;
use crate::risk::{RiskBand, decide, round_probability, validate_threshold};
use crate::row::FeatureRow;

/// Factors reported per prediction unless configured otherwise.
pub const DEFAULT_TOP_FACTORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub expected_columns: Vec<String>,
    pub threshold: f64,
    pub model_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Probability of CHD within ten years, rounded to four decimals.
    pub probability: f64,
    /// `1` when the probability reaches the threshold.
    pub prediction: u8,
    pub threshold: f64,
    pub model_version: String,
    pub risk_band: RiskBand,
    pub top_factors: Vec<TopFactor>,
}

/// One scored upload row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    /// Passthrough identifiers, aligned with [`BatchResult::passthrough_columns`].
    pub passthrough: Vec<Option<String>>,
    pub features: FeatureRow,
    pub probability: f64,
    pub prediction: bool,
    pub risk_band: RiskBand,
    pub top_factors: Vec<TopFactor>,
}

/// Everything kept for a scored batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub model_version: String,
    pub threshold: f64,
    pub feature_columns: Vec<String>,
    pub passthrough_columns: Vec<String>,
    pub rows: Vec<ScoredRow>,
    pub report: ReconciliationReport,
}

impl BatchResult {
    pub fn positives(&self) -> usize {
        self.rows.iter().filter(|row| row.prediction).count()
    }
}

/// Receipt returned by [`PredictionService::score_batch`].
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub rows: usize,
    pub positives: usize,
    pub threshold: f64,
    pub report: ReconciliationReport,
}

#[derive(Debug)]
pub struct PredictionService {
    bundle: ModelBundle,
    config: Arc<ReconciliationConfig>,
    top_factors: usize,
    cache: BatchCache<BatchResult>,
}

impl PredictionService {
    /// Builds the service, requiring the bundle's declared schema to match the config.
    pub fn new(bundle: ModelBundle, config: Arc<ReconciliationConfig>) -> Result<Self> {
        bundle.validate()?;
        bundle.check_schema(config.schema())?;
        info!(
            model_version = %bundle.model_version,
            threshold = bundle.threshold,
            features = bundle.input_schema.len(),
            "prediction service ready"
        );
        Ok(Self {
            bundle,
            config,
            top_factors: DEFAULT_TOP_FACTORS,
            cache: BatchCache::new(),
        })
    }

    pub fn load(bundle_path: &Path, config: Arc<ReconciliationConfig>) -> Result<Self> {
        Self::new(ModelBundle::load(bundle_path)?, config)
    }

    pub fn with_top_factors(mut self, k: usize) -> Self {
        self.top_factors = k;
        self
    }

    pub fn with_cache(mut self, cache: BatchCache<BatchResult>) -> Self {
        self.cache = cache;
        self
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    pub fn meta(&self) -> ModelMeta {
        ModelMeta {
            expected_columns: self.bundle.input_schema.clone(),
            threshold: self.bundle.threshold,
            model_version: self.bundle.model_version.clone(),
        }
    }

    /// Scores one validated patient at the bundle threshold.
    pub fn predict(&self, input: &PatientInput) -> Result<Prediction> {
        let row = input.to_feature_row()?;
        let contributions = self.bundle.contributions(&row);
        let probability = logistic(self.bundle.linear_term(&contributions));
        let threshold = self.bundle.threshold;
        Ok(Prediction {
            probability: round_probability(probability),
            prediction: u8::from(decide(probability, threshold)),
            threshold,
            model_version: self.bundle.model_version.clone(),
            risk_band: RiskBand::from_probability(probability),
            top_factors: top_factors(&contributions, self.top_factors),
        })
    }

    /// Reconciles and scores an upload, caching the result.
    ///
    /// `threshold` overrides the bundle threshold for this batch.
    pub fn score_batch(&self, raw: &DataFrame, threshold: Option<f64>) -> Result<BatchSummary> {
        let threshold = validate_threshold(threshold.unwrap_or(self.bundle.threshold))?;
        let span = info_span!("score_batch", rows = raw.height(), threshold);
        let _guard = span.enter();

        let (ready, report) = prepare_for_model(raw, &self.config)?;
        let rows = self.score_ready(&ready, threshold)?;
        let row_count = rows.len();
        let positives = rows.iter().filter(|row| row.prediction).count();
        let summary_report = report.clone();
        let batch_id = self.cache.insert_with(|batch_id| BatchResult {
            batch_id,
            model_version: self.bundle.model_version.clone(),
            threshold,
            feature_columns: ready.feature_columns().to_vec(),
            passthrough_columns: ready.passthrough_columns().to_vec(),
            rows,
            report,
        });
        debug!(%batch_id, positives, "cached scored batch");
        Ok(BatchSummary {
            batch_id,
            rows: row_count,
            positives,
            threshold,
            report: summary_report,
        })
    }

    /// A cached batch, or `None` once it has expired.
    pub fn batch(&self, id: &Uuid) -> Option<Arc<BatchResult>> {
        self.cache.get(id)
    }

    fn score_ready(&self, ready: &ReadyRecordSet, threshold: f64) -> Result<Vec<ScoredRow>> {
        let frame = ready.frame();
        let schema = self.config.schema();
        let mut rows = Vec::with_capacity(ready.height());
        for idx in 0..ready.height() {
            let features = FeatureRow::from_frame(frame, schema, idx)?;
            let contributions = self.bundle.contributions(&features);
            let probability = logistic(self.bundle.linear_term(&contributions));
            let mut passthrough = Vec::with_capacity(ready.passthrough_columns().len());
            for name in ready.passthrough_columns() {
                let value = frame.column(name)?.get(idx).unwrap_or(AnyValue::Null);
                passthrough.push(any_to_string_opt(value));
            }
            rows.push(ScoredRow {
                passthrough,
                features,
                probability,
                prediction: decide(probability, threshold),
                risk_band: RiskBand::from_probability(probability),
                top_factors: top_factors(&contributions, self.top_factors),
            });
        }
        Ok(rows)
    }
}
