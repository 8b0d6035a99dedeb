//! Polars `AnyValue` helpers.

use polars::prelude::{AnyValue, DataFrame};

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::Boolean(v) => Some(if v { 1.0 } else { 0.0 }),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Value of `column` at `idx` as a trimmed string; empty when absent.
pub fn column_value_string(df: &DataFrame, column: &str, idx: usize) -> String {
    match df.column(column) {
        Ok(series) => any_to_string(series.get(idx).unwrap_or(AnyValue::Null))
            .trim()
            .to_string(),
        Err(_) => String::new(),
    }
}

/// Value of `column` at `idx` as f64, None when absent or non-numeric.
pub fn column_value_f64(df: &DataFrame, column: &str, idx: usize) -> Option<f64> {
    let series = df.column(column).ok()?;
    any_to_f64(series.get(idx).ok()?)
}

/// Actual name of `column` in `df`, matched case-insensitively.
pub fn find_column(df: &DataFrame, column: &str) -> Option<String> {
    df.get_column_names()
        .iter()
        .find(|name| name.eq_ignore_ascii_case(column))
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_rejects_empty_and_garbage() {
        assert_eq!(parse_f64(" 26.5 "), Some(26.5));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("n/a"), None);
    }

    #[test]
    fn format_numeric_strips_trailing_zeros() {
        assert_eq!(format_numeric(26.0), "26");
        assert_eq!(format_numeric(0.5), "0.5");
    }
}
