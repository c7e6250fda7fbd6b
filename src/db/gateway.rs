//! ClickHouse gateway.
//!
//! Executes a single SQL statement against the analytics store over the
//! ClickHouse HTTP interface and returns a normalized [`QueryOutcome`].
//! Errors never cross this boundary as panics or `Err` values: every
//! failure mode (unreachable host, rejected credentials, bad SQL, timeout)
//! becomes an outcome with `success = false` and the server's message
//! captured verbatim. No retries are performed.
//!
//! The gateway exclusively owns the HTTP client. It is constructed once from
//! a [`ConnectionConfig`], shared via `Arc`, and safe for concurrent use
//! (reqwest pools connections internally).

use crate::db::sql_guard;
use crate::error::{AgentError, AgentResult};
use crate::models::{
    ColumnMeta, ConnectionConfig, MAX_QUERY_TIMEOUT_SECS, QueryOutcome, QueryRequest, ROW_CAP, Row,
};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Fixed introspection query listing `(table, name, type)` triples for the
/// active database, ordered by table then declared column position.
const SCHEMA_INFO_SQL: &str = "\
    SELECT table, name, type \
    FROM system.columns \
    WHERE database = currentDatabase() \
    ORDER BY table, position";

/// Fixed introspection query listing `(table, row_count)` for every table in
/// the active database.
const TABLE_STATS_SQL: &str = "\
    SELECT name AS table, total_rows AS row_count \
    FROM system.tables \
    WHERE database = currentDatabase()";

/// Shape of a ClickHouse HTTP response in `JSON` format.
#[derive(Debug, Deserialize)]
struct JsonResponseBody {
    #[serde(default)]
    meta: Vec<ColumnMeta>,
    #[serde(default)]
    data: Vec<Row>,
}

/// Gateway owning the live connection to the ClickHouse analytics store.
pub struct Gateway {
    client: reqwest::Client,
    config: ConnectionConfig,
    default_timeout: Duration,
}

impl Gateway {
    /// Create a new gateway from a connection configuration.
    ///
    /// No network traffic happens here: the connection is exercised lazily on
    /// first use, so a missing host or bad credentials surface as a failed
    /// outcome then, not as a startup error.
    pub fn new(config: ConnectionConfig, query_timeout_secs: u64) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(AgentError::from)?;

        Ok(Self {
            client,
            config,
            default_timeout: Duration::from_secs(query_timeout_secs),
        })
    }

    /// The configured target, safe for logging.
    pub fn masked_endpoint(&self) -> String {
        self.config.masked_endpoint()
    }

    /// Execute a single statement and return a normalized outcome.
    ///
    /// The statement is validated as read-only before it is sent; column and
    /// row order are preserved as returned by the store; results are
    /// truncated at [`ROW_CAP`] rows.
    pub async fn execute(&self, request: &QueryRequest) -> QueryOutcome {
        match self.run(request).await {
            Ok(outcome) => outcome,
            // Store rejections carry the server message verbatim
            Err(AgentError::Query { message, .. }) => QueryOutcome::failed(message),
            Err(e) => QueryOutcome::failed(e.to_string()),
        }
    }

    /// Convenience wrapper for a plain SQL string with no parameters.
    pub async fn execute_sql(&self, sql: &str) -> QueryOutcome {
        self.execute(&QueryRequest::new(sql)).await
    }

    /// Get the current database schema: `(table, name, type)` per column.
    pub async fn schema_info(&self) -> QueryOutcome {
        self.execute_sql(SCHEMA_INFO_SQL).await
    }

    /// Get per-table row counts: `(table, row_count)`.
    pub async fn table_stats(&self) -> QueryOutcome {
        self.execute_sql(TABLE_STATS_SQL).await
    }

    async fn run(&self, request: &QueryRequest) -> AgentResult<QueryOutcome> {
        sql_guard::validate_readonly(&request.sql)?;

        let query_timeout = request
            .timeout_secs
            .map(|t| Duration::from_secs(t.min(MAX_QUERY_TIMEOUT_SECS) as u64))
            .unwrap_or(self.default_timeout);
        let timeout_secs = query_timeout.as_secs() as u32;

        let mut url = self.config.endpoint().map_err(|e| {
            AgentError::connection(e.to_string(), "Set CLICKHOUSE_HOST before querying")
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("database", &self.config.database);
            pairs.append_pair("default_format", "JSON");
            for (name, value) in &request.params {
                pairs.append_pair(&format!("param_{name}"), &value.to_wire());
            }
        }

        debug!(
            sql = %request.sql,
            params = request.params.len(),
            timeout_secs,
            "Executing statement"
        );

        let send = async {
            let response = self
                .client
                .post(url)
                .header("X-ClickHouse-User", &self.config.user)
                .header("X-ClickHouse-Key", &self.config.password)
                .body(request.sql.clone())
                .send()
                .await?;

            let status = response.status();
            let exception_code = response
                .headers()
                .get("x-clickhouse-exception-code")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await?;
            Ok::<_, AgentError>((status, exception_code, body))
        };

        let (status, exception_code, body) = match timeout(query_timeout, send).await {
            Ok(result) => result?,
            Err(_) => return Err(AgentError::timeout("query execution", timeout_secs)),
        };

        if !status.is_success() {
            // The ClickHouse error text goes through verbatim for the caller.
            return Err(AgentError::query(
                body.trim(),
                exception_code,
                "Check the generated SQL against the schema from schema_info",
            ));
        }

        Ok(parse_body(&body))
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("endpoint", &self.masked_endpoint())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

/// Map a successful HTTP body into an outcome, preserving column and row
/// order and applying the row cap.
fn parse_body(body: &str) -> QueryOutcome {
    if body.trim().is_empty() {
        return QueryOutcome::empty();
    }

    let parsed: JsonResponseBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return QueryOutcome::failed(format!("Malformed response from store: {e}"));
        }
    };

    if parsed.data.is_empty() {
        return QueryOutcome::empty();
    }

    let total_rows = parsed.data.len();
    let mut rows = parsed.data;
    if total_rows > ROW_CAP {
        warn!(total_rows, cap = ROW_CAP, "Query result truncated");
        rows.truncate(ROW_CAP);
    }

    QueryOutcome::ok(parsed.meta, rows)
}
