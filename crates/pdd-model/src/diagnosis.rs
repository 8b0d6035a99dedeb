//! Per-patient diagnosis records produced by the Case Diagnoser.

use serde::{Deserialize, Serialize};

/// Number of sub-criteria in the diagnostic checklist.
pub const CRITERIA_COUNT: usize = 8;

/// Short labels for the eight sub-criteria, checklist order.
pub const CRITERIA_LABELS: [&str; CRITERIA_COUNT] = [
    "pd_diagnosis",
    "pd_before_dementia",
    "global_deficit",
    "functional_impact",
    "cognitive_impairment",
    "no_major_depression",
    "no_delirium",
    "no_other_explanation",
];

/// The five cognitive-domain impairment booleans for one patient under one
/// criteria variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpairmentProfile {
    pub attention: bool,
    pub executive: bool,
    pub global: bool,
    pub memory: bool,
    pub language: bool,
}

impl ImpairmentProfile {
    /// Count of impaired domains among the four original ones
    /// (attention, executive, global, memory).
    pub fn original_count(&self) -> usize {
        [self.attention, self.executive, self.global, self.memory]
            .into_iter()
            .filter(|impaired| *impaired)
            .count()
    }

    /// Count of impaired domains among all five.
    pub fn full_count(&self) -> usize {
        self.original_count() + usize::from(self.language)
    }
}

/// Diagnosis of one patient under one criteria variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDiagnosis {
    /// Patient identifier.
    pub id: String,
    /// Criteria variant name.
    pub variant: String,
    /// Per-domain impairment booleans.
    pub impairments: ImpairmentProfile,
    /// Functional-impact boolean (IADL score worse than threshold).
    pub iadl_impact: bool,
    /// The eight sub-criteria, checklist order (see [`CRITERIA_LABELS`]).
    pub criteria: [bool; CRITERIA_COUNT],
}

impl CaseDiagnosis {
    /// Probable PDD: all eight sub-criteria satisfied.
    pub fn pdd(&self) -> bool {
        self.criteria.iter().filter(|met| **met).count() == CRITERIA_COUNT
    }
}
