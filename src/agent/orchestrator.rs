//! Query orchestrator.
//!
//! Turns a single SQL string (already translated from natural language by
//! the calling agent) into an [`AnalysisPackage`]: checks that schema and
//! table metadata are reachable, executes the query, normalizes and caps the
//! rows, and wraps them in the fixed analysis prompt. Each call is
//! independent and stateless beyond the injected gateway; failures come back
//! as package fields, never as panics or `Err`.

use crate::agent::normalize::normalize_rows;
use crate::agent::prompt::analysis_prompt;
use crate::db::Gateway;
use crate::models::{AnalysisPackage, ROW_CAP};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fixed message for the metadata precondition failure.
pub const PRECONDITION_ERROR: &str = "Failed to get schema or table information";

pub struct Orchestrator {
    gateway: Arc<Gateway>,
}

impl Orchestrator {
    /// Create an orchestrator over the given gateway.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Process a single query end to end.
    ///
    /// Sequential chain of at most three store round trips: schema
    /// introspection, table stats, then the query itself. If either
    /// introspection call fails the query is never executed and the fixed
    /// precondition message is returned.
    pub async fn process(&self, query: &str) -> AnalysisPackage {
        let schema = self.gateway.schema_info().await;
        let stats = self.gateway.table_stats().await;

        if !schema.success || !stats.success {
            warn!(
                schema_ok = schema.success,
                stats_ok = stats.success,
                "Metadata precondition failed, skipping query execution"
            );
            return AnalysisPackage::failed(PRECONDITION_ERROR);
        }

        let outcome = self.gateway.execute_sql(query).await;

        if let Some(error) = outcome.error {
            debug!(%error, "Query returned an error");
            return AnalysisPackage::executed_without_results(query, Some(error));
        }

        let mut rows = outcome.rows;
        rows.truncate(ROW_CAP);
        normalize_rows(&mut rows, &outcome.columns);

        if rows.is_empty() {
            return AnalysisPackage::executed_without_results(query, None);
        }

        let analysis = analysis_prompt(&rows);
        debug!(rows = rows.len(), "Packaging analysis");
        AnalysisPackage::ok(query, rows, analysis)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("gateway", &self.gateway)
            .finish()
    }
}
