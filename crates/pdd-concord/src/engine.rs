//! The Concordance Engine: pairwise statistics over the long-format
//! diagnosis frame.
//!
//! Every ordered pair of criteria variants (self-pairs included) gets one
//! [`PairStatistics`] row. Self-pairs are sentinels (Kappa and Accuracy
//! exactly 1, everything else absent); non-self pairs are computed from
//! the confusion matrix over the patients the two variants share.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::info;

use pdd_ingest::{any_to_string, column_value_string};

use crate::matrix::ConfusionMatrix;
use crate::stats::{
    ConfidenceInterval, accuracy_interval, accuracy_vs_nir_p, kappa_interval, mcnemar_p,
};

/// PDD labels per variant, keyed by patient id.
#[derive(Debug, Clone, Default)]
pub struct VariantLabels {
    labels: BTreeMap<String, BTreeMap<String, bool>>,
    order: Vec<String>,
}

impl VariantLabels {
    /// Extract labels from the long diagnosis frame (`id`, `variant`,
    /// `pdd` columns). Variant order is first appearance.
    pub fn from_frame(frame: &DataFrame) -> Result<Self> {
        let pdd = frame.column("pdd").context("long frame 'pdd' column")?;
        let mut extracted = VariantLabels::default();
        for idx in 0..frame.height() {
            let id = column_value_string(frame, "id", idx);
            let variant = column_value_string(frame, "variant", idx);
            let value = pdd.get(idx).map(any_to_string).unwrap_or_default();
            let label = matches!(value.as_str(), "true" | "1" | "Y");
            if id.is_empty() || variant.is_empty() {
                bail!("long frame row {idx} lacks id or variant");
            }
            if !extracted.labels.contains_key(&variant) {
                extracted.order.push(variant.clone());
            }
            extracted.labels.entry(variant).or_default().insert(id, label);
        }
        Ok(extracted)
    }

    /// Variant names in first-appearance order.
    pub fn variants(&self) -> &[String] {
        &self.order
    }

    /// Labels of one variant.
    pub fn labels(&self, variant: &str) -> Option<&BTreeMap<String, bool>> {
        self.labels.get(variant)
    }

    /// Positive-diagnosis prevalence of one variant over its own patients.
    pub fn prevalence(&self, variant: &str) -> Option<f64> {
        let labels = self.labels.get(variant)?;
        if labels.is_empty() {
            return None;
        }
        let positive = labels.values().filter(|label| **label).count();
        Some(positive as f64 / labels.len() as f64)
    }

    /// Paired label vectors over the patients both variants diagnosed,
    /// ascending id order.
    pub fn paired(&self, predictor: &str, reference: &str) -> (Vec<bool>, Vec<bool>) {
        let (Some(pred), Some(refr)) = (self.labels.get(predictor), self.labels.get(reference))
        else {
            return (Vec::new(), Vec::new());
        };
        let mut predictor_labels = Vec::new();
        let mut reference_labels = Vec::new();
        for (id, label) in pred {
            if let Some(reference_label) = refr.get(id) {
                predictor_labels.push(*label);
                reference_labels.push(*reference_label);
            }
        }
        (predictor_labels, reference_labels)
    }
}

/// Concordance statistics for one ordered (predictor, reference) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStatistics {
    pub predictor: String,
    pub reference: String,
    /// Patients shared by the pair.
    pub n: u64,
    pub kappa: Option<ConfidenceInterval>,
    pub accuracy: Option<ConfidenceInterval>,
    pub no_information_rate: Option<f64>,
    /// One-sided p for accuracy exceeding the NIR.
    pub accuracy_p: Option<f64>,
    /// Star annotation: `accuracy_p < alpha`.
    pub significant: bool,
    pub mcnemar_p: Option<f64>,
    pub sensitivity: Option<f64>,
    pub specificity: Option<f64>,
    pub ppv: Option<f64>,
    pub npv: Option<f64>,
    /// Raw counts; absent for self-pairs.
    pub matrix: Option<ConfusionMatrix>,
}

impl PairStatistics {
    pub fn is_self_pair(&self) -> bool {
        self.predictor == self.reference
    }
}

/// The full pairwise table plus the variant order it was computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcordanceTable {
    pub variants: Vec<String>,
    pub pairs: Vec<PairStatistics>,
}

impl ConcordanceTable {
    /// The statistics for one ordered pair.
    pub fn pair(&self, predictor: &str, reference: &str) -> Option<&PairStatistics> {
        self.pairs
            .iter()
            .find(|pair| pair.predictor == predictor && pair.reference == reference)
    }

    /// Mean no-information rate over all non-self pairs (heatmap center).
    pub fn mean_no_information_rate(&self) -> Option<f64> {
        let rates: Vec<f64> = self
            .pairs
            .iter()
            .filter_map(|pair| pair.no_information_rate)
            .collect();
        if rates.is_empty() {
            None
        } else {
            Some(rates.iter().sum::<f64>() / rates.len() as f64)
        }
    }
}

/// Compute the full ordered cross-product of pairwise statistics.
pub fn concordance(labels: &VariantLabels, alpha: f64) -> Result<ConcordanceTable> {
    let variants = labels.variants().to_vec();
    let mut pairs = Vec::with_capacity(variants.len() * variants.len());
    for predictor in &variants {
        for reference in &variants {
            pairs.push(pair_statistics(labels, predictor, reference, alpha)?);
        }
    }
    info!(
        variants = variants.len(),
        pairs = pairs.len(),
        "concordance table computed"
    );
    Ok(ConcordanceTable { variants, pairs })
}

fn pair_statistics(
    labels: &VariantLabels,
    predictor: &str,
    reference: &str,
    alpha: f64,
) -> Result<PairStatistics> {
    if predictor == reference {
        let n = labels.labels(predictor).map(BTreeMap::len).unwrap_or(0) as u64;
        return Ok(PairStatistics {
            predictor: predictor.to_string(),
            reference: reference.to_string(),
            n,
            kappa: Some(ConfidenceInterval::exact(1.0)),
            accuracy: Some(ConfidenceInterval::exact(1.0)),
            no_information_rate: None,
            accuracy_p: None,
            significant: false,
            mcnemar_p: None,
            sensitivity: None,
            specificity: None,
            ppv: None,
            npv: None,
            matrix: None,
        });
    }
    let (predictor_labels, reference_labels) = labels.paired(predictor, reference);
    let matrix = ConfusionMatrix::from_labels(&predictor_labels, &reference_labels);
    let accuracy_p = accuracy_vs_nir_p(&matrix)?;
    let significant = accuracy_p.map(|p| p < alpha).unwrap_or(false);
    Ok(PairStatistics {
        predictor: predictor.to_string(),
        reference: reference.to_string(),
        n: matrix.total(),
        kappa: kappa_interval(&matrix, alpha)?,
        accuracy: accuracy_interval(&matrix, alpha)?,
        no_information_rate: matrix.no_information_rate(),
        accuracy_p,
        significant,
        mcnemar_p: mcnemar_p(&matrix)?,
        sensitivity: matrix.sensitivity(),
        specificity: matrix.specificity(),
        ppv: matrix.positive_predictive_value(),
        npv: matrix.negative_predictive_value(),
        matrix: Some(matrix),
    })
}
