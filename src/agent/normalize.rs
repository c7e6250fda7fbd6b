//! Row normalization.
//!
//! ClickHouse's JSON format renders `DateTime` values as
//! `"YYYY-MM-DD hh:mm:ss"`. Downstream consumers get canonical ISO-8601
//! text instead, so every date/time value is rewritten to the `T`-separated
//! form. Plain `Date` values are already ISO-8601 and pass through, as does
//! every non-temporal scalar.

use crate::models::{ColumnMeta, Row};
use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Normalize the temporal values of a single row in place, guided by the
/// column metadata the gateway returned.
pub fn normalize_row(row: &mut Row, columns: &[ColumnMeta]) {
    for col in columns {
        if !col.is_temporal() {
            continue;
        }
        if let Some(value) = row.get_mut(&col.name) {
            normalize_value(value);
        }
    }
}

/// Normalize every row of a result set.
pub fn normalize_rows(rows: &mut [Row], columns: &[ColumnMeta]) {
    for row in rows.iter_mut() {
        normalize_row(row, columns);
    }
}

fn normalize_value(value: &mut JsonValue) {
    let JsonValue::String(text) = value else {
        return;
    };
    if let Some(iso) = to_iso8601(text) {
        *value = JsonValue::String(iso);
    }
}

/// Convert a ClickHouse datetime rendering to ISO-8601. Returns None when the
/// text is not in datetime form (plain dates, NULL renderings, free text).
fn to_iso8601(text: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok()?;
    Some(parsed.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}
