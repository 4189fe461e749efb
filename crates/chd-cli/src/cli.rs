//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use chd_score::DEFAULT_TOP_FACTORS;

#[derive(Parser)]
#[command(
    name = "chd",
    version,
    about = "CHD risk toolkit - reconcile patient uploads and score ten-year CHD risk",
    long_about = "Reconcile patient uploads with arbitrary header spelling, units and \
                  encodings into the model's canonical feature vector, then score them.\n\n\
                  Accepts CSV, TSV and JSON uploads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Reconciliation tables (TOML) replacing the built-in defaults.
    #[arg(long = "config", value_name = "TOML", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient identifiers in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the canonical features, their ranges and accepted header synonyms.
    Schema,

    /// Reconcile an upload and print the correction report.
    Reconcile(ReconcileArgs),

    /// Score a single patient given as JSON.
    Predict(PredictArgs),

    /// Reconcile and score every row of an upload.
    Score(ScoreArgs),

    /// Show the model bundle's expected columns, threshold and version.
    Meta(MetaArgs),
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Upload to reconcile (.csv, .txt, .tsv, .tab or .json).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the model-ready records to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Print the report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Model bundle (JSON).
    #[arg(long = "model", value_name = "BUNDLE")]
    pub model: PathBuf,

    /// Patient record (JSON object).
    #[arg(long = "input", value_name = "JSON")]
    pub input: PathBuf,

    /// Number of contributing features to report.
    #[arg(long = "top-factors", value_name = "K", default_value_t = DEFAULT_TOP_FACTORS)]
    pub top_factors: usize,
}

#[derive(Parser)]
pub struct ScoreArgs {
    /// Upload to score.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Model bundle (JSON).
    #[arg(long = "model", value_name = "BUNDLE")]
    pub model: PathBuf,

    /// Decision threshold overriding the bundle's, in [0, 1].
    #[arg(long = "threshold", value_name = "T")]
    pub threshold: Option<f64>,

    /// Write scored rows to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Number of contributing features to report per row.
    #[arg(long = "top-factors", value_name = "K", default_value_t = DEFAULT_TOP_FACTORS)]
    pub top_factors: usize,
}

#[derive(Parser)]
pub struct MetaArgs {
    /// Model bundle (JSON).
    #[arg(long = "model", value_name = "BUNDLE")]
    pub model: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
