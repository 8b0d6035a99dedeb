//! Pipeline stage functions: ingest, diagnose, concordance, output.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use pdd_concord::{ConcordanceTable, VariantLabels, concordance};
use pdd_diagnose::{diagnose_sample, diagnosis_frame};
use pdd_ingest::{
    build_patient_frame, check_fluency_consistency, check_score_ranges, default_score_ranges,
    load_criteria_file, read_csv_table, resolve_duplicate_visits,
};
use pdd_model::{ConflictPolicy, PipelineOptions, ResolvedVariant};
use pdd_report::{
    OrderedVariant, order_by_prevalence, write_concordance_csv, write_frame_csv, write_heatmaps,
    write_summary_json,
};

use crate::types::{RunResult, VariantReport};

/// Primary verbal-fluency column (semantic fluency).
pub const FLUENCY_PRIMARY: &str = "fluency_s";
/// Secondary verbal-fluency column (phonemic fluency).
pub const FLUENCY_SECONDARY: &str = "fluency_p";
/// Score-point difference beyond which the two measures conflict.
pub const FLUENCY_TOLERANCE: f64 = 5.0;

/// Configuration for a full pipeline run.
pub struct RunConfig {
    pub patients: PathBuf,
    pub criteria: PathBuf,
    pub output_dir: PathBuf,
    pub options: PipelineOptions,
    pub visit_column: Option<String>,
    pub dry_run: bool,
}

/// A validated patient frame plus what import validation flagged.
#[derive(Debug)]
pub struct IngestResult {
    pub frame: DataFrame,
    pub fluency_conflicts: Vec<String>,
}

/// Load and validate the patient table: range checks, fluency
/// cross-check, duplicate-visit resolution.
pub fn ingest(
    path: &Path,
    visit_column: Option<&str>,
    policy: ConflictPolicy,
) -> Result<IngestResult> {
    let span = info_span!("ingest", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let table = read_csv_table(path).with_context(|| format!("read {}", path.display()))?;
    let frame = build_patient_frame(&table).context("build patient frame")?;
    check_score_ranges(&frame, &default_score_ranges()).context("score range validation")?;
    let fluency_conflicts = check_fluency_consistency(
        &frame,
        FLUENCY_PRIMARY,
        FLUENCY_SECONDARY,
        FLUENCY_TOLERANCE,
        policy,
    )
    .context("fluency consistency check")?;
    let frame = resolve_duplicate_visits(&frame, visit_column).context("resolve visits")?;
    info!(
        patients = frame.height(),
        conflicts = fluency_conflicts.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        frame,
        fluency_conflicts,
    })
}

/// Load the criteria table and resolve every variant against the
/// patient frame's columns.
pub fn load_variants(path: &Path, frame: &DataFrame) -> Result<Vec<ResolvedVariant>> {
    let variants =
        load_criteria_file(path).with_context(|| format!("read {}", path.display()))?;
    let columns = frame.get_column_names();
    let resolved = variants
        .iter()
        .map(|variant| {
            variant
                .resolve(&columns)
                .with_context(|| format!("resolve variant {}", variant.name))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(variants = resolved.len(), "criteria variants resolved");
    Ok(resolved)
}

/// Run the whole pipeline.
pub fn run(config: &RunConfig) -> Result<RunResult> {
    let IngestResult {
        frame,
        fluency_conflicts,
    } = ingest(
        &config.patients,
        config.visit_column.as_deref(),
        config.options.conflict_policy,
    )?;
    let variants = load_variants(&config.criteria, &frame)?;

    let diagnose_span = info_span!("diagnose");
    let long_frame = diagnose_span.in_scope(|| -> Result<DataFrame> {
        let diagnoses = diagnose_sample(&frame, &variants);
        diagnosis_frame(&diagnoses).context("assemble diagnosis frame")
    })?;

    let concord_span = info_span!("concordance");
    let (labels, table) = concord_span.in_scope(|| -> Result<(VariantLabels, ConcordanceTable)> {
        let labels = VariantLabels::from_frame(&long_frame).context("collect variant labels")?;
        let table = concordance(&labels, config.options.alpha)?;
        Ok((labels, table))
    })?;
    let ordered = order_by_prevalence(&labels, &variants);
    let reports = variant_reports(&labels, &variants, &ordered);

    let mut outputs = Vec::new();
    if !config.dry_run {
        let span = info_span!("output", dir = %config.output_dir.display());
        let _guard = span.enter();
        std::fs::create_dir_all(&config.output_dir)
            .with_context(|| format!("create {}", config.output_dir.display()))?;
        let diagnoses_path = config.output_dir.join("diagnoses.csv");
        write_frame_csv(&long_frame, &diagnoses_path)?;
        outputs.push(diagnoses_path);
        let concordance_path = config.output_dir.join("concordance.csv");
        write_concordance_csv(&table, &concordance_path)?;
        outputs.push(concordance_path);
        let summary_path = config.output_dir.join("summary.json");
        write_summary_json(&table, &ordered, config.options.alpha, &summary_path)?;
        outputs.push(summary_path);
        if config.options.write_plots {
            let plot_dir = config.output_dir.join("plots");
            outputs.extend(write_heatmaps(
                &table,
                &ordered,
                &plot_dir,
                config.options.kappa_display,
            )?);
        }
        info!(files = outputs.len(), "outputs written");
    }

    Ok(RunResult {
        patients: frame.height(),
        output_dir: config.output_dir.clone(),
        dry_run: config.dry_run,
        fluency_conflicts,
        variants: reports,
        ordered,
        table,
        display: config.options.kappa_display,
        outputs,
    })
}

/// Per-variant positive counts, in prevalence order.
pub fn variant_reports(
    labels: &VariantLabels,
    variants: &[ResolvedVariant],
    ordered: &[OrderedVariant],
) -> Vec<VariantReport> {
    ordered
        .iter()
        .map(|entry| {
            let (positives, patients) = labels
                .labels(&entry.name)
                .map(|cases| (cases.values().filter(|&&pdd| pdd).count(), cases.len()))
                .unwrap_or((0, 0));
            let rule = variants
                .iter()
                .find(|variant| variant.name == entry.name)
                .map(|variant| variant.rule)
                .unwrap_or(pdd_model::ImpairmentRule::Original);
            VariantReport {
                name: entry.name.clone(),
                rule,
                iadl_source: entry.iadl_source,
                positives,
                patients,
                prevalence: entry.prevalence,
            }
        })
        .collect()
}
