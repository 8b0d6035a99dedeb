//! Criteria-table loading.
//!
//! One row per criteria variant. Expected headers: `variant`, `group`,
//! optional `iadl_source`, and `<domain>_test` / `<domain>_cutoff` pairs
//! for attention, executive, global, memory, language and iadl. The global
//! and iadl pairs are mandatory; an empty or absent cognitive-domain pair
//! leaves that domain unset (it falls back to the global criterion when
//! the variant is resolved).

use std::path::Path;

use anyhow::{Context, Result, bail};

use pdd_model::{CriteriaVariant, DomainCriterion, IadlSource, ImpairmentRule, PddError, TestDomain};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::polars_utils::parse_f64;

/// Load criteria variants from a delimited file.
pub fn load_criteria_file(path: &Path) -> Result<Vec<CriteriaVariant>> {
    let table = read_csv_table(path)?;
    parse_criteria_table(&table)
        .with_context(|| format!("parse criteria table {}", path.display()))
}

/// Parse a raw table into criteria variants.
pub fn parse_criteria_table(table: &CsvTable) -> Result<Vec<CriteriaVariant>> {
    for required in ["variant", "group"] {
        if table.column_index(required).is_none() {
            return Err(PddError::MissingColumn {
                source_name: "criteria table".to_string(),
                column: required.to_string(),
            }
            .into());
        }
    }
    let mut variants = Vec::with_capacity(table.rows.len());
    for (row_number, row) in table.rows.iter().enumerate() {
        let variant = parse_variant_row(table, row)
            .with_context(|| format!("criteria row {}", row_number + 1))?;
        variants.push(variant);
    }
    if variants.is_empty() {
        bail!("criteria table defines no variants");
    }
    Ok(variants)
}

fn parse_variant_row(table: &CsvTable, row: &[String]) -> Result<CriteriaVariant> {
    let name = cell(table, row, "variant");
    if name.is_empty() {
        bail!("empty variant name");
    }
    let rule = ImpairmentRule::from_group_tag(&cell(table, row, "group"))?;
    let iadl_source = match cell(table, row, "iadl_source").to_ascii_lowercase().as_str() {
        "faq" => IadlSource::Faq,
        _ => IadlSource::Other,
    };
    let global = domain_criterion(table, row, TestDomain::Global)?
        .ok_or_else(|| anyhow::anyhow!("variant '{name}' has no global test/cutoff"))?;
    let iadl = domain_criterion(table, row, TestDomain::Iadl)?
        .ok_or_else(|| anyhow::anyhow!("variant '{name}' has no iadl test/cutoff"))?;
    Ok(CriteriaVariant {
        name,
        rule,
        iadl_source,
        global,
        iadl,
        attention: domain_criterion(table, row, TestDomain::Attention)?,
        executive: domain_criterion(table, row, TestDomain::Executive)?,
        memory: domain_criterion(table, row, TestDomain::Memory)?,
        language: domain_criterion(table, row, TestDomain::Language)?,
    })
}

fn domain_criterion(
    table: &CsvTable,
    row: &[String],
    domain: TestDomain,
) -> Result<Option<DomainCriterion>> {
    let column = cell(table, row, &format!("{}_test", domain.label()));
    let cutoff_raw = cell(table, row, &format!("{}_cutoff", domain.label()));
    if column.is_empty() && cutoff_raw.is_empty() {
        return Ok(None);
    }
    if column.is_empty() || cutoff_raw.is_empty() {
        bail!("domain '{domain}' needs both a test and a cutoff");
    }
    let Some(threshold) = parse_f64(&cutoff_raw) else {
        bail!("domain '{domain}' cutoff '{cutoff_raw}' is not numeric");
    };
    Ok(Some(DomainCriterion { column, threshold }))
}

fn cell(table: &CsvTable, row: &[String], column: &str) -> String {
    table
        .column_index(column)
        .and_then(|idx| row.get(idx))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn parses_minimal_variant() {
        let table = table(
            &[
                "variant",
                "group",
                "iadl_source",
                "global_test",
                "global_cutoff",
                "iadl_test",
                "iadl_cutoff",
            ],
            &[&["mds_mmse", "mmse", "faq", "mmse", "26", "faq", "9"]],
        );
        let variants = parse_criteria_table(&table).expect("parse");
        assert_eq!(variants.len(), 1);
        let variant = &variants[0];
        assert_eq!(variant.rule, ImpairmentRule::Original);
        assert_eq!(variant.iadl_source, IadlSource::Faq);
        assert_eq!(variant.global, DomainCriterion::new("mmse", 26.0));
        assert!(variant.attention.is_none());
    }

    #[test]
    fn rejects_unknown_group() {
        let table = table(
            &[
                "variant",
                "group",
                "global_test",
                "global_cutoff",
                "iadl_test",
                "iadl_cutoff",
            ],
            &[&["x", "dsm5", "mmse", "26", "faq", "9"]],
        );
        assert!(parse_criteria_table(&table).is_err());
    }

    #[test]
    fn rejects_half_specified_domain() {
        let table = table(
            &[
                "variant",
                "group",
                "global_test",
                "global_cutoff",
                "iadl_test",
                "iadl_cutoff",
                "memory_test",
                "memory_cutoff",
            ],
            &[&["x", "moca", "moca", "26", "faq", "9", "recall", ""]],
        );
        assert!(parse_criteria_table(&table).is_err());
    }
}
