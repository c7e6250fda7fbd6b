//! Connection-related data models.
//!
//! This module defines the value object describing how to reach the
//! ClickHouse HTTP interface. It is constructed once at startup and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use url::Url;

/// Protocol used to reach the ClickHouse HTTP interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    /// URL scheme string for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Default ClickHouse HTTP interface port for this protocol.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 8123,
            Self::Https => 8443,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scheme())
    }
}

/// Configuration for the ClickHouse connection.
///
/// Absence of host/user/password is deliberately not validated here: per the
/// connection contract it surfaces as a connection failure on first use, not
/// as a load-time error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
}

impl ConnectionConfig {
    /// Build the base endpoint URL for the ClickHouse HTTP interface.
    pub fn endpoint(&self) -> Result<Url, ConnectionConfigError> {
        if self.host.is_empty() {
            return Err(ConnectionConfigError::MissingHost);
        }
        let raw = format!("{}://{}:{}/", self.protocol.scheme(), self.host, self.port);
        Url::parse(&raw).map_err(|e| ConnectionConfigError::InvalidEndpoint(raw, e.to_string()))
    }

    /// Get a display-safe description of the target (credentials masked).
    pub fn masked_endpoint(&self) -> String {
        format!(
            "{}://{}:****@{}:{}/{}",
            self.protocol.scheme(),
            self.user,
            self.host,
            self.port,
            self.database
        )
    }
}

/// Errors that can occur when building the endpoint from a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionConfigError {
    /// No host was configured (CLICKHOUSE_HOST unset)
    #[error("No ClickHouse host configured. Set CLICKHOUSE_HOST or pass --host.")]
    MissingHost,

    /// Host/port do not form a valid URL
    #[error("Invalid ClickHouse endpoint {0}: {1}")]
    InvalidEndpoint(String, String),
}
