//! Reporting layer: prevalence ordering, terminal matrix tables, SVG
//! heatmaps, and machine-readable CSV/JSON outputs.

pub mod heatmap;
pub mod ordering;
pub mod output;
pub mod tables;

pub use heatmap::write_heatmaps;
pub use ordering::{OrderedVariant, order_by_prevalence};
pub use output::{write_concordance_csv, write_frame_csv, write_summary_json};
pub use tables::{MatrixMetric, matrix_table};
