//! Configuration handling for the ClickHouse analytics MCP server.
//!
//! This module provides configuration management via CLI arguments and
//! environment variables. Connection pieces follow the `CLICKHOUSE_*`
//! convention and are read once at startup; a missing host or credentials
//! surface as a connection failure on first use, not as a load error.

use crate::models::{ConnectionConfig, Protocol};
use clap::{Parser, ValueEnum};

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Server configuration parsed from CLI arguments and environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ch-analytics-mcp",
    version,
    about = "MCP server for ClickHouse website analytics"
)]
pub struct Config {
    /// Protocol for the ClickHouse HTTP interface
    #[arg(long, env = "CLICKHOUSE_PROTOCOL", value_enum, default_value_t = Protocol::Https)]
    pub protocol: Protocol,

    /// ClickHouse host
    #[arg(long, env = "CLICKHOUSE_HOST", default_value = "")]
    pub host: String,

    /// ClickHouse HTTP interface port
    #[arg(long, env = "CLICKHOUSE_PORT", default_value_t = 8443)]
    pub port: u16,

    /// ClickHouse user
    #[arg(long, env = "CLICKHOUSE_USER", default_value = "")]
    pub user: String,

    /// ClickHouse password (sensitive - prefer the environment variable)
    #[arg(long, env = "CLICKHOUSE_PASS", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database to query
    #[arg(long, env = "CLICKHOUSE_DB", default_value = "default")]
    pub database: String,

    /// Model identifier the deployment steers (informational, passed to clients)
    #[arg(long, env = "AGENT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Transport mode: stdio or http
    #[arg(long, value_enum, default_value_t = TransportMode::Stdio)]
    pub transport: TransportMode,

    /// Host to bind the HTTP transport to
    #[arg(long, default_value = DEFAULT_HTTP_HOST)]
    pub http_host: String,

    /// Port to bind the HTTP transport to
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    pub http_port: u16,

    /// MCP endpoint path for the HTTP transport
    #[arg(long, default_value = DEFAULT_MCP_ENDPOINT)]
    pub mcp_endpoint: String,

    /// Query timeout in seconds
    #[arg(long, default_value_t = DEFAULT_QUERY_TIMEOUT_SECS)]
    pub query_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,
}

impl Config {
    /// Build the immutable connection configuration for the gateway.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            protocol: self.protocol,
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::try_parse_from(["ch-analytics-mcp"]).unwrap();
        assert_eq!(config.port, 8443);
        assert_eq!(config.database, "default");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.query_timeout_secs, DEFAULT_QUERY_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_cli_overrides() {
        let config = Config::try_parse_from([
            "ch-analytics-mcp",
            "--protocol",
            "http",
            "--host",
            "ch.internal",
            "--port",
            "8123",
            "--database",
            "search_console",
            "--transport",
            "http",
            "--http-port",
            "3000",
        ])
        .unwrap();

        assert_eq!(config.protocol, Protocol::Http);
        assert_eq!(config.host, "ch.internal");
        assert_eq!(config.port, 8123);
        assert_eq!(config.database, "search_console");
        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(config.http_port, 3000);
    }

    #[test]
    fn test_connection_config_carries_credentials() {
        let config = Config::try_parse_from([
            "ch-analytics-mcp",
            "--host",
            "ch.internal",
            "--user",
            "analytics",
            "--password",
            "secret",
        ])
        .unwrap();

        let conn = config.connection_config();
        assert_eq!(conn.host, "ch.internal");
        assert_eq!(conn.user, "analytics");
        assert_eq!(conn.password, "secret");
    }

    #[test]
    fn test_empty_host_is_not_a_parse_error() {
        // Missing host must surface at first use, not at load time
        let config = Config::try_parse_from(["ch-analytics-mcp"]).unwrap();
        assert!(config.host.is_empty());
    }

    #[test]
    fn test_transport_mode_display() {
        assert_eq!(TransportMode::Stdio.to_string(), "stdio");
        assert_eq!(TransportMode::Http.to_string(), "http");
    }
}
