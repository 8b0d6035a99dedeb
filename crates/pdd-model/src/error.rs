//! Error types shared across the PDD pipeline crates.

use std::fmt;

use thiserror::Error;

/// A single raw test score outside its registered range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
    /// Patient identifier of the offending row.
    pub id: String,
    /// Column holding the out-of-range value.
    pub column: String,
    /// The offending value as imported.
    pub value: f64,
    /// Inclusive lower bound of the registered range.
    pub min: f64,
    /// Inclusive upper bound of the registered range.
    pub max: f64,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id {}: {} = {} outside [{}, {}]",
            self.id, self.column, self.value, self.min, self.max
        )
    }
}

#[derive(Debug, Error)]
pub enum PddError {
    /// A criteria variant references a test column the patient table lacks.
    #[error("criteria variant '{variant}' references unknown test column '{column}'")]
    UnknownTestColumn { variant: String, column: String },

    /// Unrecognized impairment-group tag in a criteria table.
    #[error("unknown impairment group '{0}' (expected mmse, moca, smoca or lvlII)")]
    UnknownGroup(String),

    /// Required column missing from an input file.
    #[error("input '{source_name}' is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: String,
    },

    /// Raw test scores outside their registered ranges; import halts.
    #[error("{} raw test score(s) out of range", .0.len())]
    ScoresOutOfRange(Vec<RangeViolation>),

    /// Redundant fluency measures disagree and the policy is set to halt.
    #[error("conflicting verbal fluency measures for patient(s): {}", .0.join(", "))]
    FluencyConflict(Vec<String>),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, PddError>;
