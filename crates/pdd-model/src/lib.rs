pub mod criteria;
pub mod diagnosis;
pub mod domains;
pub mod error;
pub mod options;

pub use criteria::{
    CriteriaVariant, DomainCriterion, IadlSource, ImpairmentRule, ResolvedVariant,
};
pub use diagnosis::{CRITERIA_COUNT, CRITERIA_LABELS, CaseDiagnosis, ImpairmentProfile};
pub use domains::TestDomain;
pub use error::{PddError, RangeViolation, Result};
pub use options::{ConflictPolicy, KappaDisplay, PipelineOptions};
