//! Data ingestion for the PDD concordance pipeline: delimited-file
//! loading, frame typing, and import-time validation.

pub mod criteria_file;
pub mod csv_table;
pub mod frame;
pub mod polars_utils;
pub mod validate;

pub use criteria_file::{load_criteria_file, parse_criteria_table};
pub use csv_table::{CsvTable, read_csv_table};
pub use frame::{ID_COLUMN, build_patient_frame};
pub use polars_utils::{
    any_to_f64, any_to_string, column_value_f64, column_value_string, find_column, format_numeric,
    parse_f64,
};
pub use validate::{
    ScoreRange, check_fluency_consistency, check_score_ranges, default_score_ranges,
    resolve_duplicate_visits,
};
