//! Result types shared by the pipeline and the terminal summary.

use std::path::PathBuf;

use pdd_concord::ConcordanceTable;
use pdd_model::{IadlSource, ImpairmentRule, KappaDisplay};
use pdd_report::OrderedVariant;

/// Per-variant diagnosis counts for the summary table.
pub struct VariantReport {
    pub name: String,
    pub rule: ImpairmentRule,
    pub iadl_source: IadlSource,
    pub positives: usize,
    pub patients: usize,
    pub prevalence: f64,
}

/// Everything a finished `run` produced.
pub struct RunResult {
    pub patients: usize,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub fluency_conflicts: Vec<String>,
    pub variants: Vec<VariantReport>,
    pub ordered: Vec<OrderedVariant>,
    pub table: ConcordanceTable,
    pub display: KappaDisplay,
    pub outputs: Vec<PathBuf>,
}

/// Result of the diagnosis-only command.
pub struct DiagnoseResult {
    pub patients: usize,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub variants: Vec<VariantReport>,
    pub outputs: Vec<PathBuf>,
}
