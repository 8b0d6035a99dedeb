//! CLI library components for the PDD concordance pipeline.

pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
