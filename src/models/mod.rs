//! Data models for the ClickHouse analytics MCP server.
//!
//! This module re-exports all model types used throughout the application.

pub mod analysis;
pub mod connection;
pub mod query;

// Re-export commonly used types
pub use analysis::AnalysisPackage;
pub use connection::{ConnectionConfig, ConnectionConfigError, Protocol};
pub use query::{
    ColumnMeta, DEFAULT_QUERY_TIMEOUT_SECS, MAX_QUERY_TIMEOUT_SECS, QueryOutcome, QueryParam,
    QueryRequest, ROW_CAP, Row,
};
