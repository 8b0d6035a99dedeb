//! Configuration options for pipeline behavior.

use serde::{Deserialize, Serialize};

/// Policy for disagreements between redundant measures of the same
/// construct (the two verbal-fluency scores).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConflictPolicy {
    /// Keep the primary measure, log each conflicting row, continue.
    #[default]
    PreferPrimary,
    /// Treat any disagreement as an import error.
    Halt,
}

/// How the pairwise Kappa matrix is rendered.
///
/// Kappa is symmetric under predictor/reference exchange, so the original
/// report blanks one triangle of the matrix rather than showing each value
/// twice. Directional metrics (accuracy annotation aside, sensitivity,
/// specificity) always render both triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KappaDisplay {
    /// Blank the upper triangle relative to the prevalence ordering.
    #[default]
    Triangle,
    /// Show Kappa in both directions.
    Full,
}

/// Options controlling diagnosis and concordance behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Significance level for the accuracy-vs-NIR star annotation and the
    /// confidence intervals (intervals use `1 - alpha` coverage).
    pub alpha: f64,
    /// Redundant-measure disagreement policy.
    pub conflict_policy: ConflictPolicy,
    /// Kappa matrix rendering mode.
    pub kappa_display: KappaDisplay,
    /// Render the four SVG heatmaps.
    pub write_plots: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            conflict_policy: ConflictPolicy::default(),
            kappa_display: KappaDisplay::default(),
            write_plots: true,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    #[must_use]
    pub fn with_kappa_display(mut self, display: KappaDisplay) -> Self {
        self.kappa_display = display;
        self
    }

    #[must_use]
    pub fn with_plots(mut self, enable: bool) -> Self {
        self.write_plots = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_study_protocol() {
        let options = PipelineOptions::default();
        assert_eq!(options.alpha, 0.05);
        assert_eq!(options.conflict_policy, ConflictPolicy::PreferPrimary);
        assert_eq!(options.kappa_display, KappaDisplay::Triangle);
        assert!(options.write_plots);
    }
}
