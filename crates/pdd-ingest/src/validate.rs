//! Import-time validation of the patient table.
//!
//! Three checks run between CSV loading and diagnosis:
//!
//! 1. raw-score range validation — out-of-range values halt the import
//!    with every offending row listed;
//! 2. redundant verbal-fluency consistency — disagreements are logged and
//!    the primary measure wins, unless the policy escalates them to errors;
//! 3. duplicate-visit resolution — the diagnosis stage requires one row
//!    per patient id.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{debug, warn};

use pdd_model::{ConflictPolicy, PddError, RangeViolation, Result};

use crate::frame::ID_COLUMN;
use crate::polars_utils::{column_value_f64, column_value_string, find_column};

/// Inclusive valid range for a raw score column.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRange {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }
}

/// Ranges for the screening instruments this study exports.
pub fn default_score_ranges() -> Vec<ScoreRange> {
    vec![
        ScoreRange::new("mmse", 0.0, 30.0),
        ScoreRange::new("moca", 0.0, 30.0),
        ScoreRange::new("smoca", 0.0, 16.0),
        ScoreRange::new("faq", 0.0, 30.0),
    ]
}

/// Check every registered range against the frame.
///
/// Ranges whose column is absent are skipped (not every export carries
/// every instrument). All violations are collected before failing so the
/// report lists every offending row.
///
/// # Errors
///
/// [`PddError::ScoresOutOfRange`] with one [`RangeViolation`] per
/// offending `(id, column, value)`.
pub fn check_score_ranges(df: &DataFrame, ranges: &[ScoreRange]) -> Result<()> {
    let mut violations = Vec::new();
    for range in ranges {
        let Some(column) = find_column(df, &range.column) else {
            continue;
        };
        for idx in 0..df.height() {
            let Some(value) = column_value_f64(df, &column, idx) else {
                continue;
            };
            if value < range.min || value > range.max {
                violations.push(RangeViolation {
                    id: column_value_string(df, ID_COLUMN, idx),
                    column: column.clone(),
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(PddError::ScoresOutOfRange(violations))
    }
}

/// Check two redundant measures of verbal fluency against each other.
///
/// Rows where both measures are present and differ by more than
/// `tolerance` are conflicts. Under [`ConflictPolicy::PreferPrimary`] each
/// conflict is logged at WARN and the primary column is kept; under
/// [`ConflictPolicy::Halt`] conflicts fail the import. Returns the ids of
/// conflicting rows.
pub fn check_fluency_consistency(
    df: &DataFrame,
    primary: &str,
    secondary: &str,
    tolerance: f64,
    policy: ConflictPolicy,
) -> Result<Vec<String>> {
    let (Some(primary), Some(secondary)) = (find_column(df, primary), find_column(df, secondary))
    else {
        // Nothing to cross-check when one of the measures was not exported.
        return Ok(Vec::new());
    };
    let mut conflicting = Vec::new();
    for idx in 0..df.height() {
        let (Some(a), Some(b)) = (
            column_value_f64(df, &primary, idx),
            column_value_f64(df, &secondary, idx),
        ) else {
            continue;
        };
        if (a - b).abs() > tolerance {
            let id = column_value_string(df, ID_COLUMN, idx);
            warn!(
                id = %id,
                %primary,
                %secondary,
                primary_value = a,
                secondary_value = b,
                "verbal fluency measures disagree; keeping primary"
            );
            conflicting.push(id);
        }
    }
    if !conflicting.is_empty() && policy == ConflictPolicy::Halt {
        return Err(PddError::FluencyConflict(conflicting));
    }
    Ok(conflicting)
}

/// Keep one row per patient id.
///
/// When `visit_column` is present, rows are ordered by it (ascending,
/// missing values last) before the first row per id is kept; otherwise
/// input order decides. Dropped rows are logged at DEBUG.
pub fn resolve_duplicate_visits(
    df: &DataFrame,
    visit_column: Option<&str>,
) -> Result<DataFrame> {
    let order = visit_order(df, visit_column);
    let mut seen = std::collections::BTreeSet::new();
    let mut keep = vec![false; df.height()];
    for &idx in &order {
        let id = column_value_string(df, ID_COLUMN, idx);
        if seen.insert(id.clone()) {
            keep[idx] = true;
        } else {
            debug!(id = %id, row = idx, "dropping duplicate visit row");
        }
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let deduped = df
        .filter(&mask)
        .map_err(|error| PddError::Message(format!("dedupe patient frame: {error}")))?;
    Ok(deduped)
}

fn visit_order(df: &DataFrame, visit_column: Option<&str>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..df.height()).collect();
    if let Some(visit) = visit_column.and_then(|name| find_column(df, name)) {
        order.sort_by(|a, b| {
            let left = column_value_f64(df, &visit, *a);
            let right = column_value_f64(df, &visit, *b);
            match (left, right) {
                (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(std::cmp::Ordering::Equal),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn frame(ids: Vec<&str>, mmse: Vec<Option<f64>>, visit: Vec<Option<f64>>) -> DataFrame {
        let columns: Vec<Column> = vec![
            Series::new(
                "id".into(),
                ids.iter().map(|id| (*id).to_string()).collect::<Vec<_>>(),
            )
            .into_column(),
            Series::new("mmse".into(), mmse).into_column(),
            Series::new("visit".into(), visit).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn out_of_range_scores_all_reported() {
        let df = frame(
            vec!["P001", "P002", "P003"],
            vec![Some(31.0), Some(28.0), Some(-1.0)],
            vec![None, None, None],
        );
        let error = check_score_ranges(&df, &default_score_ranges()).unwrap_err();
        match error {
            PddError::ScoresOutOfRange(violations) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].id, "P001");
                assert_eq!(violations[1].id, "P003");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn in_range_scores_pass() {
        let df = frame(
            vec!["P001"],
            vec![Some(30.0)],
            vec![None],
        );
        assert!(check_score_ranges(&df, &default_score_ranges()).is_ok());
    }

    #[test]
    fn duplicate_visits_keep_first_by_visit_order() {
        let df = frame(
            vec!["P001", "P001", "P002"],
            vec![Some(20.0), Some(24.0), Some(28.0)],
            vec![Some(2.0), Some(1.0), Some(1.0)],
        );
        let deduped = resolve_duplicate_visits(&df, Some("visit")).expect("dedupe");
        assert_eq!(deduped.height(), 2);
        // P001's visit-1 row (mmse 24) wins over the later visit.
        assert_eq!(column_value_f64(&deduped, "mmse", 0), Some(24.0));
    }

    #[test]
    fn duplicate_visits_keep_input_order_without_visit_column() {
        let df = frame(
            vec!["P001", "P001"],
            vec![Some(20.0), Some(24.0)],
            vec![None, None],
        );
        let deduped = resolve_duplicate_visits(&df, None).expect("dedupe");
        assert_eq!(deduped.height(), 1);
        assert_eq!(column_value_f64(&deduped, "mmse", 0), Some(20.0));
    }
}
