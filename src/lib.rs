//! ClickHouse Analytics MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools that let AI
//! assistants answer natural-language questions about website analytics by
//! executing read-only SQL against a ClickHouse store.

pub mod agent;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod transport;

pub use agent::Orchestrator;
pub use config::Config;
pub use db::Gateway;
pub use error::AgentError;
pub use mcp::AgentService;
