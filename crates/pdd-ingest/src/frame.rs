//! Typed `DataFrame` construction from raw CSV tables.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use pdd_model::PddError;

use crate::csv_table::CsvTable;
use crate::polars_utils::parse_f64;

/// Canonical name of the patient identifier column.
pub const ID_COLUMN: &str = "id";

/// Build the patient frame from a raw table.
///
/// The identifier column stays a string column; every other column becomes
/// f64 when all of its non-empty cells parse as numbers, and stays a string
/// column otherwise. Empty cells become nulls in numeric columns.
pub fn build_patient_frame(table: &CsvTable) -> Result<DataFrame> {
    let Some(id_idx) = table.column_index(ID_COLUMN) else {
        return Err(PddError::MissingColumn {
            source_name: "patient table".to_string(),
            column: ID_COLUMN.to_string(),
        }
        .into());
    };
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        let cells: Vec<&str> = table
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect();
        if idx == id_idx || !is_numeric_column(&cells) {
            let values: Vec<String> = cells.iter().map(|cell| (*cell).to_string()).collect();
            columns.push(Series::new(header.as_str().into(), values).into());
        } else {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| parse_f64(cell)).collect();
            columns.push(Series::new(header.as_str().into(), values).into());
        }
    }
    let frame = DataFrame::new(columns).context("build patient frame")?;
    Ok(frame)
}

fn is_numeric_column(cells: &[&str]) -> bool {
    let mut non_empty = 0usize;
    for cell in cells {
        if cell.trim().is_empty() {
            continue;
        }
        non_empty += 1;
        if parse_f64(cell).is_none() {
            return false;
        }
    }
    non_empty > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    fn table() -> CsvTable {
        CsvTable {
            headers: vec![
                "id".to_string(),
                "mmse".to_string(),
                "sex".to_string(),
                "faq".to_string(),
            ],
            rows: vec![
                vec![
                    "P001".to_string(),
                    "27".to_string(),
                    "f".to_string(),
                    "".to_string(),
                ],
                vec![
                    "P002".to_string(),
                    "22".to_string(),
                    "m".to_string(),
                    "11".to_string(),
                ],
            ],
        }
    }

    #[test]
    fn numeric_columns_become_f64_with_nulls() {
        let frame = build_patient_frame(&table()).expect("build frame");
        assert_eq!(frame.column("mmse").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("faq").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("faq").unwrap().null_count(), 1);
    }

    #[test]
    fn id_and_text_columns_stay_strings() {
        let frame = build_patient_frame(&table()).expect("build frame");
        assert_eq!(frame.column("id").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("sex").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn missing_id_column_is_an_error() {
        let table = CsvTable {
            headers: vec!["patient".to_string()],
            rows: vec![vec!["P001".to_string()]],
        };
        assert!(build_patient_frame(&table).is_err());
    }
}
