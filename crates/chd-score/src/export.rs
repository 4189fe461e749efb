//! Scored batch export.

use std::io::Write;

use crate::error::Result;
use crate::row::FeatureValue;
use crate::service::BatchResult;

/// Column holding the threshold decision.
pub const PREDICTION_COLUMN: &str = "pred@thr";
pub const PROBABILITY_COLUMN: &str = "proba";
pub const RISK_BAND_COLUMN: &str = "risk_band";

/// Writes passthrough columns, canonical features, `proba`, `pred@thr` and `risk_band`.
pub fn write_scored_csv<W: Write>(batch: &BatchResult, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = batch
        .passthrough_columns
        .iter()
        .chain(batch.feature_columns.iter())
        .map(String::as_str)
        .collect();
    header.extend([PROBABILITY_COLUMN, PREDICTION_COLUMN, RISK_BAND_COLUMN]);
    csv.write_record(&header)?;

    for row in &batch.rows {
        let mut record: Vec<String> = row
            .passthrough
            .iter()
            .map(|value| value.clone().unwrap_or_default())
            .collect();
        for feature in &batch.feature_columns {
            record.push(
                row.features
                    .get(feature)
                    .map(FeatureValue::render)
                    .unwrap_or_default(),
            );
        }
        record.push(row.probability.to_string());
        record.push(u8::from(row.prediction).to_string());
        record.push(row.risk_band.to_string());
        csv.write_record(&record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}
