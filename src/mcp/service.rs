//! MCP service implementation using rmcp.
//!
//! This module defines the AgentService struct exposing the orchestrator and
//! the gateway's convenience calls as MCP tools for the calling language
//! model. The model steering policy (dimensions filter, row cap, table-name
//! translation) is carried in the server instructions.

use crate::agent::{Orchestrator, naming, prompt};
use crate::db::Gateway;
use crate::error::AgentError;
use crate::models::{AnalysisPackage, QueryOutcome};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input for the process_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProcessQueryInput {
    /// The SQL query to execute against the analytics store. Must be
    /// read-only and include a dimensions filter as the first WHERE condition.
    pub query: String,
}

/// A single site entry in the list_sites output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SiteEntry {
    /// Readable site name shown to end users
    pub site: String,
    /// Internal table identifier to use in SQL (never shown to users)
    pub table: String,
    /// Approximate row count, if the store reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
}

/// Output for the list_sites tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListSitesOutput {
    pub sites: Vec<SiteEntry>,
    pub count: usize,
}

#[derive(Clone)]
pub struct AgentService {
    /// Shared gateway owning the ClickHouse connection
    gateway: Arc<Gateway>,
    /// Model identifier the deployment is steered for (informational)
    model: String,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl AgentService {
    /// Create a new AgentService instance.
    pub fn new(gateway: Arc<Gateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            tool_router: Self::tool_router(),
        }
    }

    /// Raise a metadata error for a failed introspection outcome.
    fn metadata_error(outcome: &QueryOutcome) -> McpError {
        let message = outcome
            .error
            .as_deref()
            .unwrap_or("introspection query failed");
        AgentError::metadata(message).into()
    }
}

#[tool_router]
impl AgentService {
    #[tool(
        description = "Execute a SQL query against the analytics store and package the results for analysis.\nReturns the executed SQL, up to 100 normalized rows, an analysis prompt, and any error.\nThe query must be read-only and filter on the dimensions column first."
    )]
    async fn process_query(
        &self,
        Parameters(input): Parameters<ProcessQueryInput>,
    ) -> Json<AnalysisPackage> {
        let orchestrator = Orchestrator::new(self.gateway.clone());
        Json(orchestrator.process(&input.query).await)
    }

    #[tool(
        description = "Get the current database schema.\nReturns (table, name, type) for every column, ordered by table then position."
    )]
    async fn schema_info(&self) -> Result<Json<QueryOutcome>, McpError> {
        let outcome = self.gateway.schema_info().await;
        if !outcome.success {
            return Err(Self::metadata_error(&outcome));
        }
        Ok(Json(outcome))
    }

    #[tool(
        description = "Get statistics about tables in the current database.\nReturns (table, row_count) for every table. Table names are internal identifiers; use list_sites for readable names."
    )]
    async fn table_stats(&self) -> Result<Json<QueryOutcome>, McpError> {
        let outcome = self.gateway.table_stats().await;
        if !outcome.success {
            return Err(Self::metadata_error(&outcome));
        }
        Ok(Json(outcome))
    }

    #[tool(
        description = "List the websites available in the analytics store.\nReturns readable site names alongside the internal table identifiers to use in SQL."
    )]
    async fn list_sites(&self) -> Result<Json<ListSitesOutput>, McpError> {
        let outcome = self.gateway.table_stats().await;
        if !outcome.success {
            return Err(Self::metadata_error(&outcome));
        }

        let sites: Vec<SiteEntry> = outcome
            .rows
            .iter()
            .filter_map(|row| {
                let table = row.get("table")?.as_str()?.to_string();
                if !naming::is_site_table(&table) {
                    return None;
                }
                Some(SiteEntry {
                    site: naming::site_name(&table),
                    row_count: row.get("row_count").and_then(|v| v.as_u64()),
                    table,
                })
            })
            .collect();

        let count = sites.len();
        Ok(Json(ListSitesOutput { sites, count }))
    }
}

#[tool_handler]
impl ServerHandler for AgentService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ch-analytics-mcp".to_owned(),
                title: Some("ClickHouse Analytics MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "{}\n\n(Deployment model: {})",
                prompt::AGENT_INSTRUCTIONS,
                self.model
            )),
        }
    }
}
