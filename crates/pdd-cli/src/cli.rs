//! CLI argument definitions for the PDD concordance pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pddc",
    version,
    about = "PDD criteria concordance - diagnose and compare criteria variants",
    long_about = "Diagnose Parkinson's disease dementia under multiple criteria\n\
                  variants and quantify their pairwise agreement.\n\n\
                  Produces Kappa/accuracy/sensitivity/specificity matrices,\n\
                  SVG heatmaps, and CSV/JSON outputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: diagnose, concordance, tables, plots.
    Run(RunArgs),

    /// Diagnose only: write the long diagnosis frame and per-variant counts.
    Diagnose(DiagnoseArgs),

    /// List the criteria variants parsed from a criteria file.
    Variants(VariantsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the patient assessment CSV.
    #[arg(value_name = "PATIENTS_CSV")]
    pub patients: PathBuf,

    /// Path to the criteria variant table.
    #[arg(long = "criteria", value_name = "CRITERIA_CSV")]
    pub criteria: PathBuf,

    /// Output directory (default: <PATIENTS_CSV dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Significance level for the accuracy-vs-NIR test and intervals.
    #[arg(long = "alpha", default_value_t = 0.05)]
    pub alpha: f64,

    /// Policy when the redundant verbal-fluency measures disagree.
    #[arg(long = "fluency-policy", value_enum, default_value = "prefer-primary")]
    pub fluency_policy: FluencyPolicyArg,

    /// Kappa matrix rendering: blank one triangle or show both.
    #[arg(long = "kappa-display", value_enum, default_value = "triangle")]
    pub kappa_display: KappaDisplayArg,

    /// Column ordering repeat visits; first visit per patient is kept.
    #[arg(long = "visit-column", value_name = "COLUMN")]
    pub visit_column: Option<String>,

    /// Skip the SVG heatmaps.
    #[arg(long = "no-plots")]
    pub no_plots: bool,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DiagnoseArgs {
    /// Path to the patient assessment CSV.
    #[arg(value_name = "PATIENTS_CSV")]
    pub patients: PathBuf,

    /// Path to the criteria variant table.
    #[arg(long = "criteria", value_name = "CRITERIA_CSV")]
    pub criteria: PathBuf,

    /// Output directory (default: <PATIENTS_CSV dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Column ordering repeat visits; first visit per patient is kept.
    #[arg(long = "visit-column", value_name = "COLUMN")]
    pub visit_column: Option<String>,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct VariantsArgs {
    /// Path to the criteria variant table.
    #[arg(long = "criteria", value_name = "CRITERIA_CSV")]
    pub criteria: PathBuf,
}

/// CLI fluency conflict policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum FluencyPolicyArg {
    PreferPrimary,
    Halt,
}

/// CLI Kappa display choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum KappaDisplayArg {
    Triangle,
    Full,
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
