//! Diagnostic criteria variants.
//!
//! A [`CriteriaVariant`] is one complete operationalization of the PDD
//! diagnostic algorithm: for each test domain, which score column and
//! numeric threshold counts as "impaired", plus the impairment-counting
//! rule selected by the variant's group tag.
//!
//! Variants are validated up front: [`CriteriaVariant::resolve`] checks
//! every referenced column against the patient table and fills unset
//! cognitive domains with the variant's global-cognition criterion, so the
//! diagnoser never touches an undefined column at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domains::TestDomain;
use crate::error::{PddError, Result};

/// How a variant combines per-domain impairment booleans into the
/// cognitive-impairment criterion (criterion 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpairmentRule {
    /// MMSE-based protocols: impaired iff more than one of the four
    /// original domains (attention, executive, global, memory) is impaired.
    Original,
    /// MoCA-based protocols: impaired iff more than one of all five
    /// cognitive domains (the four original plus language) is impaired.
    Moca,
    /// Short-MoCA / Level II protocols: cognitive impairment is the global
    /// deficit criterion itself (criterion 3).
    DirectGlobal,
}

impl ImpairmentRule {
    /// Parse a criteria-table group tag.
    pub fn from_group_tag(tag: &str) -> Result<Self> {
        match tag.trim() {
            "mmse" => Ok(ImpairmentRule::Original),
            "moca" => Ok(ImpairmentRule::Moca),
            "smoca" | "lvlII" => Ok(ImpairmentRule::DirectGlobal),
            other => Err(PddError::UnknownGroup(other.to_string())),
        }
    }
}

impl FromStr for ImpairmentRule {
    type Err = PddError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_group_tag(s)
    }
}

/// Which instrument operationalizes the IADL criterion; drives the
/// color-coding of variant axis labels in the concordance heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IadlSource {
    /// Functional Assessment Questionnaire.
    Faq,
    /// Any other functional instrument (e.g. pill questionnaire, ADL scale).
    #[default]
    Other,
}

/// One test column plus the numeric cutoff that counts as impaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCriterion {
    /// Score column in the patient table.
    pub column: String,
    /// Impairment cutoff. Cognitive domains are impaired below it, IADL
    /// above it (higher functional scores mean worse impact).
    pub threshold: f64,
}

impl DomainCriterion {
    pub fn new(column: impl Into<String>, threshold: f64) -> Self {
        Self {
            column: column.into(),
            threshold,
        }
    }
}

/// An unvalidated criteria variant, as authored or loaded from file.
///
/// `global` and `iadl` are mandatory; the remaining cognitive domains are
/// optional and default to the global criterion on [`resolve`].
///
/// [`resolve`]: CriteriaVariant::resolve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaVariant {
    pub name: String,
    pub rule: ImpairmentRule,
    pub iadl_source: IadlSource,
    pub global: DomainCriterion,
    pub iadl: DomainCriterion,
    pub attention: Option<DomainCriterion>,
    pub executive: Option<DomainCriterion>,
    pub memory: Option<DomainCriterion>,
    pub language: Option<DomainCriterion>,
}

impl CriteriaVariant {
    /// Validate this variant against the patient table's columns and fill
    /// unset cognitive domains with the global criterion.
    ///
    /// # Errors
    ///
    /// Returns [`PddError::UnknownTestColumn`] naming the first referenced
    /// column absent from `columns`.
    pub fn resolve<S: AsRef<str>>(&self, columns: &[S]) -> Result<ResolvedVariant> {
        let resolved = ResolvedVariant {
            name: self.name.clone(),
            rule: self.rule,
            iadl_source: self.iadl_source,
            attention: self.attention.clone().unwrap_or_else(|| self.global.clone()),
            executive: self.executive.clone().unwrap_or_else(|| self.global.clone()),
            global: self.global.clone(),
            memory: self.memory.clone().unwrap_or_else(|| self.global.clone()),
            language: self.language.clone().unwrap_or_else(|| self.global.clone()),
            iadl: self.iadl.clone(),
        };
        for domain in TestDomain::ALL {
            let column = &resolved.criterion(domain).column;
            let known = columns
                .iter()
                .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(column));
            if !known {
                return Err(PddError::UnknownTestColumn {
                    variant: self.name.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(resolved)
    }
}

impl fmt::Display for CriteriaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A fully populated, column-validated criteria variant.
///
/// Immutable once constructed; the Case Diagnoser only ever sees this form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    pub name: String,
    pub rule: ImpairmentRule,
    pub iadl_source: IadlSource,
    pub attention: DomainCriterion,
    pub executive: DomainCriterion,
    pub global: DomainCriterion,
    pub memory: DomainCriterion,
    pub language: DomainCriterion,
    pub iadl: DomainCriterion,
}

impl ResolvedVariant {
    /// The criterion operationalizing `domain` under this variant.
    pub fn criterion(&self, domain: TestDomain) -> &DomainCriterion {
        match domain {
            TestDomain::Attention => &self.attention,
            TestDomain::Executive => &self.executive,
            TestDomain::Global => &self.global,
            TestDomain::Memory => &self.memory,
            TestDomain::Language => &self.language,
            TestDomain::Iadl => &self.iadl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant() -> CriteriaVariant {
        CriteriaVariant {
            name: "mds_mmse".to_string(),
            rule: ImpairmentRule::Original,
            iadl_source: IadlSource::Faq,
            global: DomainCriterion::new("mmse", 26.0),
            iadl: DomainCriterion::new("faq", 9.0),
            attention: Some(DomainCriterion::new("serial7", 3.0)),
            executive: None,
            memory: Some(DomainCriterion::new("recall3", 2.0)),
            language: None,
        }
    }

    #[test]
    fn group_tags_parse() {
        assert_eq!(
            ImpairmentRule::from_group_tag("mmse").unwrap(),
            ImpairmentRule::Original
        );
        assert_eq!(
            ImpairmentRule::from_group_tag("moca").unwrap(),
            ImpairmentRule::Moca
        );
        assert_eq!(
            ImpairmentRule::from_group_tag("smoca").unwrap(),
            ImpairmentRule::DirectGlobal
        );
        assert_eq!(
            ImpairmentRule::from_group_tag("lvlII").unwrap(),
            ImpairmentRule::DirectGlobal
        );
        assert!(matches!(
            ImpairmentRule::from_group_tag("other"),
            Err(PddError::UnknownGroup(tag)) if tag == "other"
        ));
    }

    #[test]
    fn resolve_defaults_unset_domains_to_global() {
        let columns = ["id", "mmse", "faq", "serial7", "recall3"];
        let resolved = variant().resolve(&columns).expect("resolve");
        assert_eq!(resolved.executive, resolved.global);
        assert_eq!(resolved.language, resolved.global);
        assert_eq!(resolved.attention.column, "serial7");
        assert_eq!(resolved.memory.column, "recall3");
    }

    #[test]
    fn resolve_rejects_unknown_column() {
        let columns = ["id", "mmse", "faq", "recall3"];
        let error = variant().resolve(&columns).unwrap_err();
        match error {
            PddError::UnknownTestColumn { variant, column } => {
                assert_eq!(variant, "mds_mmse");
                assert_eq!(column, "serial7");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolve_matches_columns_case_insensitively() {
        let columns = ["ID", "MMSE", "FAQ", "Serial7", "Recall3"];
        assert!(variant().resolve(&columns).is_ok());
    }
}
