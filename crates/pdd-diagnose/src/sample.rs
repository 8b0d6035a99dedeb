//! The Sample Diagnoser: applies the Case Diagnoser once per criteria
//! variant and collects the long-format diagnosis frame consumed by the
//! concordance engine.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::info;

use pdd_model::{CRITERIA_COUNT, CaseDiagnosis, ResolvedVariant};

use crate::case::diagnose_variant;

/// Column names of the long-format diagnosis frame, fixed order.
pub const LONG_FRAME_COLUMNS: [&str; 17] = [
    "id",
    "variant",
    "pdd",
    "imp_attention",
    "imp_executive",
    "imp_global",
    "imp_memory",
    "imp_language",
    "iadl_impact",
    "crit1",
    "crit2",
    "crit3",
    "crit4",
    "crit5",
    "crit6",
    "crit7",
    "crit8",
];

/// Diagnose the whole sample under every variant.
pub fn diagnose_sample(
    frame: &DataFrame,
    variants: &[ResolvedVariant],
) -> Vec<CaseDiagnosis> {
    let mut all = Vec::with_capacity(frame.height() * variants.len());
    for variant in variants {
        all.extend(diagnose_variant(frame, variant));
    }
    info!(
        variants = variants.len(),
        patients = frame.height(),
        diagnoses = all.len(),
        "sample diagnosed"
    );
    all
}

/// Assemble diagnoses into the long-format frame: one row per
/// (patient, variant) pair.
pub fn diagnosis_frame(diagnoses: &[CaseDiagnosis]) -> Result<DataFrame> {
    let ids: Vec<String> = diagnoses.iter().map(|case| case.id.clone()).collect();
    let variants: Vec<String> = diagnoses.iter().map(|case| case.variant.clone()).collect();
    let pdd: Vec<bool> = diagnoses.iter().map(CaseDiagnosis::pdd).collect();
    let mut columns: Vec<Column> = vec![
        Series::new("id".into(), ids).into(),
        Series::new("variant".into(), variants).into(),
        Series::new("pdd".into(), pdd).into(),
    ];
    let impairment_columns: [(&str, fn(&CaseDiagnosis) -> bool); 6] = [
        ("imp_attention", |case| case.impairments.attention),
        ("imp_executive", |case| case.impairments.executive),
        ("imp_global", |case| case.impairments.global),
        ("imp_memory", |case| case.impairments.memory),
        ("imp_language", |case| case.impairments.language),
        ("iadl_impact", |case| case.iadl_impact),
    ];
    for (name, accessor) in impairment_columns {
        let values: Vec<bool> = diagnoses.iter().map(|case| accessor(case)).collect();
        columns.push(Series::new(name.into(), values).into());
    }
    for index in 0..CRITERIA_COUNT {
        let values: Vec<bool> = diagnoses.iter().map(|case| case.criteria[index]).collect();
        columns.push(Series::new(format!("crit{}", index + 1).as_str().into(), values).into());
    }
    DataFrame::new(columns).context("build long diagnosis frame")
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::IntoColumn;

    use pdd_model::{CriteriaVariant, DomainCriterion, IadlSource, ImpairmentRule};

    fn patient_frame() -> DataFrame {
        let columns: Vec<Column> = vec![
            Series::new("id".into(), vec!["P001".to_string(), "P002".to_string()]).into_column(),
            Series::new("mmse".into(), vec![Some(20.0), Some(29.0)]).into_column(),
            Series::new("faq".into(), vec![Some(12.0), Some(1.0)]).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    fn variants() -> Vec<ResolvedVariant> {
        let columns = ["id", "mmse", "faq"];
        ["a", "b"]
            .iter()
            .map(|name| {
                CriteriaVariant {
                    name: (*name).to_string(),
                    rule: ImpairmentRule::DirectGlobal,
                    iadl_source: IadlSource::Other,
                    global: DomainCriterion::new("mmse", 26.0),
                    iadl: DomainCriterion::new("faq", 9.0),
                    attention: None,
                    executive: None,
                    memory: None,
                    language: None,
                }
                .resolve(&columns)
                .expect("resolve")
            })
            .collect()
    }

    #[test]
    fn long_frame_has_one_row_per_patient_variant_pair() {
        let diagnoses = diagnose_sample(&patient_frame(), &variants());
        assert_eq!(diagnoses.len(), 4);
        let frame = diagnosis_frame(&diagnoses).expect("frame");
        assert_eq!(frame.height(), 4);
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, LONG_FRAME_COLUMNS.to_vec());
    }

    #[test]
    fn diagnosis_is_deterministic() {
        let first = diagnose_sample(&patient_frame(), &variants());
        let second = diagnose_sample(&patient_frame(), &variants());
        assert_eq!(first, second);
    }
}
