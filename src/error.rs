//! Error types for the ClickHouse analytics MCP server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Every kind is caught at the gateway or orchestrator boundary and converted into a
//! value-typed outcome; none is allowed to propagate as a crash to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Query failed: {message}")]
    Query {
        /// ClickHouse server error text, captured verbatim.
        message: String,
        /// e.g., "60" for unknown table
        code: Option<String>,
        suggestion: String,
    },

    #[error("Metadata introspection failed: {message}")]
    Metadata { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Read-only violation: {operation} - {reason}")]
    ReadOnly { operation: String, reason: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u32,
    },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl AgentError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a query error with optional ClickHouse error code.
    pub fn query(
        message: impl Into<String>,
        code: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Query {
            message: message.into(),
            code,
            suggestion: suggestion.into(),
        }
    }

    /// Create a metadata error.
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a read-only violation error.
    pub fn read_only(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadOnly {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u32) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Query { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Check if this error is retryable. No retry is performed anywhere in
    /// this crate; the flag is advisory for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}

/// Convert reqwest errors to AgentError.
impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AgentError::timeout("http request", 0)
        } else if err.is_connect() {
            AgentError::connection(
                format!("Cannot reach ClickHouse: {}", err),
                "Check CLICKHOUSE_HOST/CLICKHOUSE_PORT and network connectivity",
            )
        } else if err.is_builder() {
            AgentError::invalid_input(format!("Invalid request: {}", err))
        } else {
            AgentError::connection(
                format!("HTTP transport error: {}", err),
                "Check that the ClickHouse HTTP interface is enabled",
            )
        }
    }
}

/// Result type alias for gateway and orchestrator operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert AgentError to MCP ErrorData for semantic error categorization.
/// Includes the suggestion field in the `data` object when available.
impl From<AgentError> for rmcp::ErrorData {
    fn from(err: AgentError) -> Self {
        match &err {
            AgentError::InvalidInput { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), suggestion_data(err.suggestion()))
            }
            AgentError::ReadOnly { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), suggestion_data(err.suggestion()))
            }
            AgentError::Query {
                message,
                code,
                suggestion,
            } => {
                let msg = match code {
                    Some(code) => format!("{} (code: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::invalid_params(msg, suggestion_data(Some(suggestion)))
            }
            AgentError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(Some(suggestion)))
            }
            AgentError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some(
                    "Consider increasing --query-timeout or narrowing the query",
                )),
            ),
            AgentError::Metadata { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
            AgentError::Unexpected { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}
