use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use pdd_concord::VariantLabels;
use pdd_diagnose::{diagnose_sample, diagnosis_frame};
use pdd_ingest::load_criteria_file;
use pdd_model::{ConflictPolicy, DomainCriterion, KappaDisplay, PipelineOptions};
use pdd_report::{order_by_prevalence, write_frame_csv};

use pdd_cli::pipeline::{self, IngestResult, RunConfig};
use pdd_cli::summary::{apply_table_style, header_cell, iadl_cell, rule_label};
use pdd_cli::types::{DiagnoseResult, RunResult};

use crate::cli::{DiagnoseArgs, FluencyPolicyArg, KappaDisplayArg, RunArgs, VariantsArgs};

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let options = PipelineOptions::new()
        .with_alpha(args.alpha)
        .with_conflict_policy(conflict_policy(args.fluency_policy))
        .with_kappa_display(kappa_display(args.kappa_display))
        .with_plots(!args.no_plots);
    let config = RunConfig {
        patients: args.patients.clone(),
        criteria: args.criteria.clone(),
        output_dir: output_dir(&args.patients, args.output_dir.as_deref()),
        options,
        visit_column: args.visit_column.clone(),
        dry_run: args.dry_run,
    };
    pipeline::run(&config)
}

pub fn run_diagnose(args: &DiagnoseArgs) -> Result<DiagnoseResult> {
    let IngestResult { frame, .. } = pipeline::ingest(
        &args.patients,
        args.visit_column.as_deref(),
        ConflictPolicy::PreferPrimary,
    )?;
    let variants = pipeline::load_variants(&args.criteria, &frame)?;
    let diagnoses = diagnose_sample(&frame, &variants);
    let long_frame = diagnosis_frame(&diagnoses).context("assemble diagnosis frame")?;
    let labels = VariantLabels::from_frame(&long_frame).context("collect variant labels")?;
    let ordered = order_by_prevalence(&labels, &variants);
    let reports = pipeline::variant_reports(&labels, &variants, &ordered);

    let output_dir = output_dir(&args.patients, args.output_dir.as_deref());
    let mut outputs = Vec::new();
    if !args.dry_run {
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("create {}", output_dir.display()))?;
        let path = output_dir.join("diagnoses.csv");
        write_frame_csv(&long_frame, &path)?;
        outputs.push(path);
    }
    Ok(DiagnoseResult {
        patients: frame.height(),
        output_dir,
        dry_run: args.dry_run,
        variants: reports,
        outputs,
    })
}

pub fn run_variants(args: &VariantsArgs) -> Result<()> {
    let variants = load_criteria_file(&args.criteria)
        .with_context(|| format!("read {}", args.criteria.display()))?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Rule"),
        header_cell("IADL"),
        header_cell("Global"),
        header_cell("IADL cutoff"),
        header_cell("Attention"),
        header_cell("Executive"),
        header_cell("Memory"),
        header_cell("Language"),
    ]);
    apply_table_style(&mut table);
    for variant in variants {
        table.add_row(vec![
            Cell::new(&variant.name),
            Cell::new(rule_label(variant.rule)),
            iadl_cell(variant.iadl_source),
            criterion_cell(Some(&variant.global)),
            criterion_cell(Some(&variant.iadl)),
            criterion_cell(variant.attention.as_ref()),
            criterion_cell(variant.executive.as_ref()),
            criterion_cell(variant.memory.as_ref()),
            criterion_cell(variant.language.as_ref()),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn criterion_cell(criterion: Option<&DomainCriterion>) -> Cell {
    match criterion {
        Some(criterion) => Cell::new(format!("{} @ {}", criterion.column, criterion.threshold)),
        // Unset domains fall back to the global criterion on resolve.
        None => Cell::new("(global)").fg(comfy_table::Color::DarkGrey),
    }
}

fn conflict_policy(arg: FluencyPolicyArg) -> ConflictPolicy {
    match arg {
        FluencyPolicyArg::PreferPrimary => ConflictPolicy::PreferPrimary,
        FluencyPolicyArg::Halt => ConflictPolicy::Halt,
    }
}

fn kappa_display(arg: KappaDisplayArg) -> KappaDisplay {
    match arg {
        KappaDisplayArg::Triangle => KappaDisplay::Triangle,
        KappaDisplayArg::Full => KappaDisplay::Full,
    }
}

fn output_dir(patients: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => patients
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
            .join("output"),
    }
}
