//! PDD diagnosis: per-patient checklist evaluation and the long-format
//! sample frame.

pub mod case;
pub mod sample;

pub use case::{diagnose_case, diagnose_variant};
pub use sample::{LONG_FRAME_COLUMNS, diagnose_sample, diagnosis_frame};
