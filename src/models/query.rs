//! Query-related data models.
//!
//! This module defines the request and outcome value objects that cross the
//! gateway boundary. `QueryOutcome` replaces exception propagation: a failed
//! statement is a value with `success = false`, never a panic.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Hard cap on rows returned from any query. Non-negotiable: results are
/// truncated here regardless of what the generated SQL asked for.
pub const ROW_CAP: usize = 100;

/// Default query timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 30;

/// Maximum query timeout in seconds.
pub const MAX_QUERY_TIMEOUT_SECS: u32 = 300;

/// A scalar parameter value for parameterized queries.
///
/// Bound server-side through the ClickHouse HTTP interface's `param_<name>`
/// mechanism, so values never get spliced into SQL text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryParam {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl QueryParam {
    /// Check if this parameter is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render this parameter in the text form the HTTP interface expects.
    pub fn to_wire(&self) -> String {
        match self {
            Self::Null => "\\N".to_string(),
            Self::Bool(v) => if *v { "1" } else { "0" }.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::String(v) => v.clone(),
        }
    }

    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

/// A single SQL statement with optional named parameters. Ephemeral, one per
/// invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
    #[serde(default)]
    pub params: BTreeMap<String, QueryParam>,
    /// Default: 30, max: 300
    #[serde(default)]
    pub timeout_secs: Option<u32>,
}

impl QueryRequest {
    /// Create a new query request with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: BTreeMap::new(),
            timeout_secs: None,
        }
    }

    /// Add a named parameter to this query.
    pub fn with_param(mut self, name: impl Into<String>, param: QueryParam) -> Self {
        self.params.insert(name.into(), param);
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Get the effective timeout (with bounds checking).
    pub fn effective_timeout(&self) -> u32 {
        self.timeout_secs
            .map(|t| t.min(MAX_QUERY_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS)
    }
}

/// Column metadata as reported by ClickHouse in the JSON response `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnMeta {
    pub name: String,
    /// ClickHouse type, e.g. "Date32", "Nullable(String)", "Int64"
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ColumnMeta {
    /// Create new column metadata.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// True if this column carries a date or datetime value, including
    /// Nullable/LowCardinality wrappers.
    pub fn is_temporal(&self) -> bool {
        let inner = self
            .type_name
            .trim_start_matches("LowCardinality(")
            .trim_start_matches("Nullable(")
            .trim_end_matches(')');
        inner.starts_with("Date") || inner.starts_with("DateTime")
    }
}

/// A single result row: flat mapping from column name to a scalar JSON value.
pub type Row = serde_json::Map<String, JsonValue>;

/// Normalized outcome of a single statement execution.
///
/// Invariant: `success == false` implies `rows` and `columns` are empty and
/// `error` is non-empty; `success == true` implies `error` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryOutcome {
    pub success: bool,
    /// Column names and types in store-declared order. Empty on failure.
    pub columns: Vec<ColumnMeta>,
    /// Result rows in store-return order, capped at [`ROW_CAP`].
    pub rows: Vec<Row>,
    /// Error message, captured verbatim from the store. None on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryOutcome {
    /// Create a success outcome.
    pub fn ok(columns: Vec<ColumnMeta>, rows: Vec<Row>) -> Self {
        Self {
            success: true,
            columns,
            rows,
            error: None,
        }
    }

    /// Create an empty success outcome (query returned no rows).
    pub fn empty() -> Self {
        Self::ok(Vec::new(), Vec::new())
    }

    /// Create a failure outcome with the given message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            columns: Vec::new(),
            rows: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Get the number of rows in the outcome.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in declared order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_types() {
        assert!(QueryParam::Null.is_null());
        assert!(!QueryParam::Bool(true).is_null());
        assert_eq!(QueryParam::Int(42).type_name(), "int");
        assert_eq!(
            QueryParam::String("hello".to_string()).type_name(),
            "string"
        );
    }

    #[test]
    fn test_query_param_wire_form() {
        assert_eq!(QueryParam::Int(42).to_wire(), "42");
        assert_eq!(QueryParam::Bool(true).to_wire(), "1");
        assert_eq!(QueryParam::Null.to_wire(), "\\N");
        assert_eq!(QueryParam::String("mobile".into()).to_wire(), "mobile");
    }

    #[test]
    fn test_query_request_builder() {
        let req = QueryRequest::new("SELECT sum(clicks) FROM t WHERE device = {device:String}")
            .with_param("device", QueryParam::String("mobile".into()))
            .with_timeout(999);

        assert_eq!(req.params.len(), 1);
        assert_eq!(req.effective_timeout(), MAX_QUERY_TIMEOUT_SECS);
    }

    #[test]
    fn test_query_request_default_timeout() {
        let req = QueryRequest::new("SELECT 1");
        assert_eq!(req.effective_timeout(), DEFAULT_QUERY_TIMEOUT_SECS);
    }

    #[test]
    fn test_column_meta_temporal() {
        assert!(ColumnMeta::new("date", "Date32").is_temporal());
        assert!(ColumnMeta::new("ts", "DateTime").is_temporal());
        assert!(ColumnMeta::new("ts", "Nullable(DateTime64(3))").is_temporal());
        assert!(ColumnMeta::new("d", "LowCardinality(Nullable(Date))").is_temporal());
        assert!(!ColumnMeta::new("query", "Nullable(String)").is_temporal());
        assert!(!ColumnMeta::new("clicks", "Int64").is_temporal());
    }

    #[test]
    fn test_outcome_invariants() {
        let ok = QueryOutcome::ok(vec![ColumnMeta::new("1", "UInt8")], Vec::new());
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed = QueryOutcome::failed("Code: 60. Unknown table");
        assert!(!failed.success);
        assert!(failed.rows.is_empty());
        assert!(failed.columns.is_empty());
        assert!(failed.error.as_deref().unwrap().contains("Code: 60"));
    }

    #[test]
    fn test_outcome_empty() {
        let outcome = QueryOutcome::empty();
        assert!(outcome.success);
        assert_eq!(outcome.row_count(), 0);
        assert!(outcome.error.is_none());
    }
}
