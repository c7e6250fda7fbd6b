//! Analysis package model.
//!
//! The orchestrator's output: the SQL that ran, the capped results, and a
//! prompt for downstream analysis by the calling agent. Produced once per
//! user query, never persisted.

use crate::models::query::Row;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisPackage {
    /// The SQL query that was executed. Empty if execution never started
    /// (precondition failure or unexpected internal error).
    pub sql_query: String,
    /// Normalized result rows, capped at 100, in store-return order.
    pub results: Vec<Row>,
    /// Fixed-template analysis prompt embedding the results. Empty on error
    /// or when the query returned no rows.
    pub analysis: String,
    /// Error message if anything went wrong, otherwise None.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisPackage {
    /// Package a successful execution.
    pub fn ok(sql_query: impl Into<String>, results: Vec<Row>, analysis: String) -> Self {
        Self {
            sql_query: sql_query.into(),
            results,
            analysis,
            error: None,
        }
    }

    /// Package a failure that occurred before any query was submitted.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            sql_query: String::new(),
            results: Vec::new(),
            analysis: String::new(),
            error: Some(error.into()),
        }
    }

    /// Package a query that was submitted but produced an error or no rows.
    /// The executed SQL is echoed so the caller can inspect what ran.
    pub fn executed_without_results(sql_query: impl Into<String>, error: Option<String>) -> Self {
        Self {
            sql_query: sql_query.into(),
            results: Vec::new(),
            analysis: String::new(),
            error,
        }
    }

    /// True if this package carries usable results.
    pub fn has_results(&self) -> bool {
        self.error.is_none() && !self.results.is_empty()
    }
}
