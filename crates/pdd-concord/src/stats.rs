//! Statistical routines over 2x2 confusion matrices: Kappa and accuracy
//! confidence intervals, the accuracy-vs-NIR exact test, and McNemar's
//! paired test.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, Binomial, ChiSquared, ContinuousCDF, DiscreteCDF, Normal};

use crate::matrix::ConfusionMatrix;

/// A point estimate with its two-sided confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// A degenerate interval for sentinel values (self-pairs).
    pub fn exact(estimate: f64) -> Self {
        Self {
            estimate,
            lower: estimate,
            upper: estimate,
        }
    }
}

/// Cohen's Kappa with its asymptotic `1 - alpha` confidence interval.
///
/// Standard error from the large-sample approximation
/// `sqrt(po (1 - po) / (n (1 - pe)^2))`; bounds clamped to [-1, 1].
/// `None` when Kappa itself is undefined (constant raters).
pub fn kappa_interval(matrix: &ConfusionMatrix, alpha: f64) -> Result<Option<ConfidenceInterval>> {
    let Some(kappa) = matrix.kappa() else {
        return Ok(None);
    };
    let observed = matrix.accuracy().unwrap_or(0.0);
    let expected = matrix.expected_agreement().unwrap_or(0.0);
    let n = matrix.total() as f64;
    let z = normal_quantile(1.0 - alpha / 2.0)?;
    let se = (observed * (1.0 - observed) / (n * (1.0 - expected).powi(2))).sqrt();
    Ok(Some(ConfidenceInterval {
        estimate: kappa,
        lower: (kappa - z * se).max(-1.0),
        upper: (kappa + z * se).min(1.0),
    }))
}

/// Accuracy with its Clopper-Pearson exact `1 - alpha` interval.
pub fn accuracy_interval(
    matrix: &ConfusionMatrix,
    alpha: f64,
) -> Result<Option<ConfidenceInterval>> {
    let Some(accuracy) = matrix.accuracy() else {
        return Ok(None);
    };
    let correct = matrix.true_positive + matrix.true_negative;
    let (lower, upper) = clopper_pearson(correct, matrix.total(), alpha)?;
    Ok(Some(ConfidenceInterval {
        estimate: accuracy,
        lower,
        upper,
    }))
}

/// Clopper-Pearson exact binomial bounds for `successes` out of `n`.
pub fn clopper_pearson(successes: u64, n: u64, alpha: f64) -> Result<(f64, f64)> {
    anyhow::ensure!(n > 0, "empty sample for Clopper-Pearson interval");
    anyhow::ensure!(successes <= n, "successes exceed sample size");
    let x = successes as f64;
    let count = n as f64;
    let lower = if successes == 0 {
        0.0
    } else {
        Beta::new(x, count - x + 1.0)
            .context("lower Clopper-Pearson beta")?
            .inverse_cdf(alpha / 2.0)
    };
    let upper = if successes == n {
        1.0
    } else {
        Beta::new(x + 1.0, count - x)
            .context("upper Clopper-Pearson beta")?
            .inverse_cdf(1.0 - alpha / 2.0)
    };
    Ok((lower.clamp(0.0, 1.0), upper.clamp(0.0, 1.0)))
}

/// One-sided exact binomial p-value for accuracy exceeding the
/// no-information rate: `P[X >= correct]` with `X ~ Bin(n, NIR)`.
pub fn accuracy_vs_nir_p(matrix: &ConfusionMatrix) -> Result<Option<f64>> {
    let Some(nir) = matrix.no_information_rate() else {
        return Ok(None);
    };
    let n = matrix.total();
    let correct = matrix.true_positive + matrix.true_negative;
    if nir >= 1.0 {
        // Degenerate reference margin: accuracy can never beat always-majority.
        return Ok(Some(1.0));
    }
    let binomial = Binomial::new(nir, n).context("accuracy-vs-NIR binomial")?;
    let p = if correct == 0 {
        1.0
    } else {
        1.0 - binomial.cdf(correct - 1)
    };
    Ok(Some(p.clamp(0.0, 1.0)))
}

/// McNemar's test p-value with continuity correction.
///
/// `None` when there are no discordant pairs (the statistic is undefined,
/// mirroring the NaN the reference stats routine reports).
pub fn mcnemar_p(matrix: &ConfusionMatrix) -> Result<Option<f64>> {
    let (b, c) = matrix.discordant();
    if b + c == 0 {
        return Ok(None);
    }
    let b = b as f64;
    let c = c as f64;
    let statistic = ((b - c).abs() - 1.0).max(0.0).powi(2) / (b + c);
    let chi = ChiSquared::new(1.0).context("McNemar chi-squared")?;
    Ok(Some((1.0 - chi.cdf(statistic)).clamp(0.0, 1.0)))
}

fn normal_quantile(p: f64) -> Result<f64> {
    let standard_normal = Normal::new(0.0, 1.0).context("standard normal")?;
    Ok(standard_normal.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nearly(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn clopper_pearson_degenerate_bounds() {
        let (lower, upper) = clopper_pearson(0, 20, 0.05).unwrap();
        assert_eq!(lower, 0.0);
        assert!(upper > 0.0 && upper < 0.3);
        let (lower, upper) = clopper_pearson(20, 20, 0.05).unwrap();
        assert!(lower > 0.7 && lower < 1.0);
        assert_eq!(upper, 1.0);
    }

    #[test]
    fn clopper_pearson_matches_known_value() {
        // binom.test(16, 20): 95% CI roughly [0.563, 0.943].
        let (lower, upper) = clopper_pearson(16, 20, 0.05).unwrap();
        assert!(nearly(lower, 0.563, 0.005), "lower = {lower}");
        assert!(nearly(upper, 0.943, 0.005), "upper = {upper}");
    }

    #[test]
    fn kappa_interval_for_split_scenario_is_centered_at_zero() {
        let matrix = ConfusionMatrix {
            true_positive: 1,
            false_positive: 1,
            true_negative: 1,
            false_negative: 1,
        };
        let interval = kappa_interval(&matrix, 0.05).unwrap().unwrap();
        assert_eq!(interval.estimate, 0.0);
        assert!(nearly(interval.lower, -interval.upper, 1e-12));
    }

    #[test]
    fn kappa_interval_clamped_to_valid_range() {
        let matrix = ConfusionMatrix {
            true_positive: 3,
            false_positive: 0,
            true_negative: 4,
            false_negative: 0,
        };
        let interval = kappa_interval(&matrix, 0.05).unwrap().unwrap();
        assert_eq!(interval.estimate, 1.0);
        assert!(interval.upper <= 1.0);
        assert!(interval.lower >= -1.0);
    }

    #[test]
    fn accuracy_beating_nir_is_significant() {
        // 45 correct of 50 with a 0.5 NIR.
        let matrix = ConfusionMatrix {
            true_positive: 22,
            false_positive: 2,
            true_negative: 23,
            false_negative: 3,
        };
        let p = accuracy_vs_nir_p(&matrix).unwrap().unwrap();
        assert!(p < 0.001, "p = {p}");
    }

    #[test]
    fn chance_level_accuracy_is_not_significant() {
        let matrix = ConfusionMatrix {
            true_positive: 1,
            false_positive: 1,
            true_negative: 1,
            false_negative: 1,
        };
        let p = accuracy_vs_nir_p(&matrix).unwrap().unwrap();
        assert!(p > 0.5, "p = {p}");
    }

    #[test]
    fn mcnemar_balanced_discordance_is_not_significant() {
        let matrix = ConfusionMatrix {
            true_positive: 10,
            false_positive: 4,
            true_negative: 10,
            false_negative: 4,
        };
        let p = mcnemar_p(&matrix).unwrap().unwrap();
        assert!(nearly(p, 1.0, 0.05), "p = {p}");
    }

    #[test]
    fn mcnemar_unbalanced_discordance_is_significant() {
        let matrix = ConfusionMatrix {
            true_positive: 10,
            false_positive: 20,
            true_negative: 10,
            false_negative: 1,
        };
        let p = mcnemar_p(&matrix).unwrap().unwrap();
        assert!(p < 0.001, "p = {p}");
    }

    #[test]
    fn mcnemar_without_discordant_pairs_is_absent() {
        let matrix = ConfusionMatrix {
            true_positive: 5,
            false_positive: 0,
            true_negative: 5,
            false_negative: 0,
        };
        assert_eq!(mcnemar_p(&matrix).unwrap(), None);
    }
}
