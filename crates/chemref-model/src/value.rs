//! Polars `AnyValue` helpers used for row-wise key building and
//! value comparison.

use polars::prelude::{AnyValue, DataFrame};

/// Converts a Polars `AnyValue` to its `String` representation.
///
/// Null becomes the empty string; floats are formatted without trailing
/// zeros so `1.50` and `1.5` compare equal.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "true" } else { "false" }.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// String form of one cell, or the empty string when the column is absent
/// or the index is out of bounds.
pub fn column_value_string(df: &DataFrame, column: &str, idx: usize) -> String {
    df.column(column)
        .ok()
        .and_then(|col| col.get(idx).ok())
        .map(any_to_string)
        .unwrap_or_default()
}

/// Composite `|`-joined key over the given columns for one row.
pub fn composite_key(df: &DataFrame, columns: &[String], idx: usize) -> String {
    let mut key = String::new();
    for (pos, name) in columns.iter().enumerate() {
        if pos > 0 {
            key.push('|');
        }
        key.push_str(column_value_string(df, name, idx).trim());
    }
    key
}
