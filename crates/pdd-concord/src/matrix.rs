//! 2x2 confusion matrices over paired PDD labels.
//!
//! The positive class is a PDD diagnosis (`true` label) by construction;
//! counts are taken directly from the boolean labels, so no factor-level
//! remapping is involved anywhere downstream.

use serde::{Deserialize, Serialize};

/// Counts for one (predictor, reference) label pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Predictor positive, reference positive.
    pub true_positive: u64,
    /// Predictor positive, reference negative.
    pub false_positive: u64,
    /// Predictor negative, reference negative.
    pub true_negative: u64,
    /// Predictor negative, reference positive.
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Cross-tabulate paired labels, PDD (`true`) as the positive class.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length (callers pair labels via an
    /// inner join, so lengths always agree).
    pub fn from_labels(predictor: &[bool], reference: &[bool]) -> Self {
        assert_eq!(
            predictor.len(),
            reference.len(),
            "paired label vectors must have equal length"
        );
        let mut matrix = ConfusionMatrix::default();
        for (&pred, &refr) in predictor.iter().zip(reference.iter()) {
            match (pred, refr) {
                (true, true) => matrix.true_positive += 1,
                (true, false) => matrix.false_positive += 1,
                (false, false) => matrix.true_negative += 1,
                (false, true) => matrix.false_negative += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// The discordant cell counts (predictor-only positives,
    /// reference-only positives) used by McNemar's test.
    pub fn discordant(&self) -> (u64, u64) {
        (self.false_positive, self.false_negative)
    }

    /// (TP + TN) / n.
    pub fn accuracy(&self) -> Option<f64> {
        let n = self.total();
        if n == 0 {
            return None;
        }
        Some((self.true_positive + self.true_negative) as f64 / n as f64)
    }

    /// TP / (TP + FN).
    pub fn sensitivity(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// TN / (TN + FP).
    pub fn specificity(&self) -> Option<f64> {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    /// TP / (TP + FP).
    pub fn positive_predictive_value(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// TN / (TN + FN).
    pub fn negative_predictive_value(&self) -> Option<f64> {
        ratio(self.true_negative, self.true_negative + self.false_negative)
    }

    /// Accuracy of always predicting the majority reference class.
    pub fn no_information_rate(&self) -> Option<f64> {
        let n = self.total();
        if n == 0 {
            return None;
        }
        let positives = self.true_positive + self.false_negative;
        let negatives = self.true_negative + self.false_positive;
        Some(positives.max(negatives) as f64 / n as f64)
    }

    /// Chance-expected agreement from the marginals.
    pub fn expected_agreement(&self) -> Option<f64> {
        let n = self.total();
        if n == 0 {
            return None;
        }
        let n = n as f64;
        let pred_pos = (self.true_positive + self.false_positive) as f64;
        let ref_pos = (self.true_positive + self.false_negative) as f64;
        let pred_neg = (self.true_negative + self.false_negative) as f64;
        let ref_neg = (self.true_negative + self.false_positive) as f64;
        Some((pred_pos * ref_pos + pred_neg * ref_neg) / (n * n))
    }

    /// Cohen's Kappa; `None` when chance agreement is already perfect.
    pub fn kappa(&self) -> Option<f64> {
        let observed = self.accuracy()?;
        let expected = self.expected_agreement()?;
        let denominator = 1.0 - expected;
        if denominator.abs() < f64::EPSILON {
            return None;
        }
        Some((observed - expected) / denominator)
    }

    /// The matrix with the predictor/reference roles exchanged.
    pub fn transposed(&self) -> Self {
        ConfusionMatrix {
            true_positive: self.true_positive,
            false_positive: self.false_negative,
            true_negative: self.true_negative,
            false_negative: self.false_positive,
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}
