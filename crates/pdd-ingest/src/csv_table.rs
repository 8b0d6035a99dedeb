//! Raw delimited-file loading.
//!
//! Both study inputs (the patient export and the criteria table) arrive as
//! delimited text. They are read into a [`CsvTable`] of trimmed strings
//! first; typing happens in [`crate::frame`].

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// An untyped delimited table: normalized headers plus string rows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of `column` among the headers, case-insensitive.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(column))
    }

    /// All values of `column`, padding short rows with empty strings.
    pub fn column_values(&self, column: &str) -> Option<Vec<String>> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect(),
        )
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a delimited file into a [`CsvTable`].
///
/// The delimiter is sniffed from the header line (`;` and tab supported
/// besides comma, matching the item-level export variants seen in the
/// field).
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let delimiter = sniff_delimiter(&raw);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let headers = reader
        .headers()
        .with_context(|| format!("read headers of {}", path.display()))?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record in {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

fn sniff_delimiter(raw: &str) -> u8 {
    let header_line = raw.lines().next().unwrap_or("");
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    let tabs = header_line.matches('\t').count();
    if semicolons > commas && semicolons > tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}
