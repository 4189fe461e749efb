use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use chd_cli::pipeline::{
    load_config, load_service, read_patient, reconcile_file, score_file, write_frame_csv,
    write_scored,
};

use crate::cli::{MetaArgs, PredictArgs, ReconcileArgs, ScoreArgs};
use crate::summary::{print_batch, print_meta, print_prediction, print_report, print_schema};

pub fn run_schema(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print_schema(&config);
    Ok(())
}

pub fn run_reconcile(args: &ReconcileArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let (ready, report) = reconcile_file(&args.file, &config)?;
    if let Some(output) = &args.output {
        write_frame_csv(ready.frame(), output)?;
        info!(path = %output.display(), rows = ready.height(), "wrote model-ready records");
    }
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_report(&config, &report, ready.height());
    }
    Ok(())
}

pub fn run_predict(args: &PredictArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let service = load_service(&args.model, config, args.top_factors)?;
    let patient = read_patient(&args.input)?;
    let prediction = service
        .predict(&patient)
        .with_context(|| format!("predict {}", args.input.display()))?;
    print_prediction(&prediction);
    Ok(())
}

pub fn run_score(args: &ScoreArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let service = load_service(&args.model, config, args.top_factors)?;
    let batch = score_file(&service, &args.file, args.threshold)?;
    if let Some(output) = &args.output {
        write_scored(&batch, output)?;
        info!(path = %output.display(), rows = batch.rows.len(), "wrote scored rows");
    }
    print_batch(&batch);
    Ok(())
}

pub fn run_meta(args: &MetaArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let service = load_service(&args.model, config, 0)?;
    print_meta(&service.meta());
    Ok(())
}
