//! Inter-criteria concordance: confusion matrices, agreement statistics,
//! and the pairwise statistics table.

pub mod engine;
pub mod matrix;
pub mod stats;

pub use engine::{ConcordanceTable, PairStatistics, VariantLabels, concordance};
pub use matrix::ConfusionMatrix;
pub use stats::{
    ConfidenceInterval, accuracy_interval, accuracy_vs_nir_p, clopper_pearson, kappa_interval,
    mcnemar_p,
};
