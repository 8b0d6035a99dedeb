//! Machine-readable outputs: CSV files plus a JSON run summary.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;

use pdd_concord::{ConcordanceTable, ConfidenceInterval};
use pdd_ingest::any_to_string;
use pdd_model::{CRITERIA_LABELS, IadlSource};

use crate::ordering::OrderedVariant;

const PAIR_HEADER: [&str; 17] = [
    "predictor",
    "reference",
    "n",
    "kappa",
    "kappa_lower",
    "kappa_upper",
    "accuracy",
    "accuracy_lower",
    "accuracy_upper",
    "no_information_rate",
    "accuracy_p",
    "significant",
    "mcnemar_p",
    "sensitivity",
    "specificity",
    "ppv",
    "npv",
];

/// Write a dataframe as CSV, one row per frame row.
pub fn write_frame_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create output file {}", path.display()))?;
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    writer.write_record(&names)?;
    for idx in 0..frame.height() {
        let mut record = Vec::with_capacity(names.len());
        for column in frame.get_columns() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            record.push(any_to_string(value));
        }
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("flush output file {}", path.display()))?;
    Ok(())
}

/// Write the pairwise statistics as a flat CSV, one row per ordered pair.
pub fn write_concordance_csv(table: &ConcordanceTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create output file {}", path.display()))?;
    writer.write_record(PAIR_HEADER)?;
    for pair in &table.pairs {
        let kappa = interval_fields(pair.kappa.as_ref());
        let accuracy = interval_fields(pair.accuracy.as_ref());
        writer.write_record([
            pair.predictor.as_str(),
            pair.reference.as_str(),
            &pair.n.to_string(),
            &kappa.0,
            &kappa.1,
            &kappa.2,
            &accuracy.0,
            &accuracy.1,
            &accuracy.2,
            &opt_field(pair.no_information_rate),
            &opt_field(pair.accuracy_p),
            if pair.significant { "true" } else { "false" },
            &opt_field(pair.mcnemar_p),
            &opt_field(pair.sensitivity),
            &opt_field(pair.specificity),
            &opt_field(pair.ppv),
            &opt_field(pair.npv),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush output file {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryVariant {
    name: String,
    prevalence: f64,
    iadl_source: &'static str,
}

#[derive(Debug, Serialize)]
struct SummaryPair {
    predictor: String,
    reference: String,
    n: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    kappa: Option<ConfidenceInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<ConfidenceInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_information_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy_p: Option<f64>,
    significant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mcnemar_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    specificity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ppv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    npv: Option<f64>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    generated_at: String,
    alpha: f64,
    /// Checklist order of the `crit1..crit8` diagnosis-frame columns.
    criteria: [&'static str; CRITERIA_LABELS.len()],
    variants: Vec<SummaryVariant>,
    pairs: Vec<SummaryPair>,
}

/// Write a pretty-printed JSON summary of the whole run.
pub fn write_summary_json(
    table: &ConcordanceTable,
    ordered: &[OrderedVariant],
    alpha: f64,
    path: &Path,
) -> Result<()> {
    let summary = RunSummary {
        generated_at: Utc::now().to_rfc3339(),
        alpha,
        criteria: CRITERIA_LABELS,
        variants: ordered
            .iter()
            .map(|variant| SummaryVariant {
                name: variant.name.clone(),
                prevalence: variant.prevalence,
                iadl_source: iadl_tag(variant.iadl_source),
            })
            .collect(),
        pairs: table
            .pairs
            .iter()
            .map(|pair| SummaryPair {
                predictor: pair.predictor.clone(),
                reference: pair.reference.clone(),
                n: pair.n,
                kappa: pair.kappa,
                accuracy: pair.accuracy,
                no_information_rate: pair.no_information_rate,
                accuracy_p: pair.accuracy_p,
                significant: pair.significant,
                mcnemar_p: pair.mcnemar_p,
                sensitivity: pair.sensitivity,
                specificity: pair.specificity,
                ppv: pair.ppv,
                npv: pair.npv,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&summary)
        .context("serialize run summary")?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write summary {}", path.display()))?;
    Ok(())
}

fn iadl_tag(source: IadlSource) -> &'static str {
    match source {
        IadlSource::Faq => "faq",
        IadlSource::Other => "other",
    }
}

fn opt_field(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn interval_fields(interval: Option<&ConfidenceInterval>) -> (String, String, String) {
    match interval {
        Some(interval) => (
            format!("{:.6}", interval.estimate),
            format!("{:.6}", interval.lower),
            format!("{:.6}", interval.upper),
        ),
        None => (String::new(), String::new(), String::new()),
    }
}
