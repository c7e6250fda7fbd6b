//! SQL statement validation for read-only enforcement.
//!
//! The analytics store is never written to by this crate; only read and
//! introspection statements are issued. The generated SQL comes from a
//! language model, so that invariant cannot be trusted to instruction text
//! alone: every statement is parsed with
//! [sqlparser](https://docs.rs/sqlparser/) and anything other than a
//! read-only query is rejected before it reaches the wire.

use crate::error::{AgentError, AgentResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::ClickHouseDialect;
use sqlparser::parser::Parser;

/// Type of SQL statement detected by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlStatementType {
    /// SELECT and other read-only queries (SELECT, SHOW, DESCRIBE, EXPLAIN)
    Select,
    /// INSERT, UPDATE, DELETE
    DmlWrite,
    /// CREATE, DROP, ALTER, TRUNCATE
    Ddl,
    /// SET, USE, KILL, OPTIMIZE and friends
    Administrative,
    /// Unknown or unparseable statement
    Unknown,
}

/// Error messages for each statement type category.
mod error_messages {
    pub const DML_WRITE: &str = "Write operations are not allowed. This store is read-only.";
    pub const DDL: &str = "DDL operations are not allowed. This store is read-only.";
    pub const ADMINISTRATIVE: &str = "Administrative operations are not allowed.";
    pub const UNKNOWN: &str = "Unrecognized SQL statement. Only read-only queries are allowed.";
    pub const PARSE_ERROR: &str = "Failed to parse SQL statement.";
}

/// Validate SQL for read-only execution.
///
/// Returns `Ok(())` if every statement is read-only (SELECT, SHOW, DESCRIBE,
/// EXPLAIN over a SELECT), or `Err(AgentError::ReadOnly)` otherwise. Parsing
/// uses the ClickHouse dialect so constructs like `LIMIT ... BY` validate.
///
/// # Examples
///
/// ```
/// use ch_analytics_mcp::db::sql_guard::validate_readonly;
///
/// assert!(validate_readonly("SELECT sum(clicks) FROM site WHERE dimensions = 'DATE'").is_ok());
/// assert!(validate_readonly("DROP TABLE site").is_err());
/// ```
pub fn validate_readonly(sql: &str) -> AgentResult<()> {
    let dialect = ClickHouseDialect {};

    let statements = Parser::parse_sql(&dialect, sql).map_err(|e| {
        AgentError::invalid_input(format!("{} Error: {}", error_messages::PARSE_ERROR, e))
    })?;

    if statements.is_empty() {
        return Err(AgentError::invalid_input("Empty SQL statement"));
    }

    for stmt in statements {
        validate_statement(&stmt)?;
    }

    Ok(())
}

/// Validate a single parsed statement.
fn validate_statement(stmt: &Statement) -> AgentResult<()> {
    let (stmt_type, operation_name) = classify_statement(stmt);

    match stmt_type {
        SqlStatementType::Select => Ok(()),
        SqlStatementType::DmlWrite => Err(AgentError::read_only(
            operation_name,
            error_messages::DML_WRITE,
        )),
        SqlStatementType::Ddl => Err(AgentError::read_only(operation_name, error_messages::DDL)),
        SqlStatementType::Administrative => Err(AgentError::read_only(
            operation_name,
            error_messages::ADMINISTRATIVE,
        )),
        SqlStatementType::Unknown => {
            Err(AgentError::read_only(operation_name, error_messages::UNKNOWN))
        }
    }
}

/// Classify a parsed statement into a statement type.
pub fn classify_statement(stmt: &Statement) -> (SqlStatementType, &'static str) {
    match stmt {
        // Read-only operations - ALLOWED
        Statement::Query(_) => (SqlStatementType::Select, "SELECT"),
        Statement::ShowTables { .. } => (SqlStatementType::Select, "SHOW TABLES"),
        Statement::ShowColumns { .. } => (SqlStatementType::Select, "SHOW COLUMNS"),
        Statement::ShowDatabases { .. } => (SqlStatementType::Select, "SHOW DATABASES"),
        Statement::ShowCreate { .. } => (SqlStatementType::Select, "SHOW CREATE"),
        Statement::ExplainTable { .. } => (SqlStatementType::Select, "EXPLAIN TABLE"),

        // EXPLAIN needs special handling - check underlying statement
        Statement::Explain { statement, .. } => {
            let (inner_type, inner_name) = classify_statement(statement);
            if inner_type == SqlStatementType::Select {
                (SqlStatementType::Select, "EXPLAIN")
            } else {
                // EXPLAIN on write operation - block it
                (inner_type, inner_name)
            }
        }

        // DML Write operations - BLOCKED
        Statement::Insert(_) => (SqlStatementType::DmlWrite, "INSERT"),
        Statement::Update { .. } => (SqlStatementType::DmlWrite, "UPDATE"),
        Statement::Delete(_) => (SqlStatementType::DmlWrite, "DELETE"),
        Statement::Merge { .. } => (SqlStatementType::DmlWrite, "MERGE"),

        // DDL operations - BLOCKED
        Statement::CreateTable { .. } => (SqlStatementType::Ddl, "CREATE TABLE"),
        Statement::CreateView { .. } => (SqlStatementType::Ddl, "CREATE VIEW"),
        Statement::CreateDatabase { .. } => (SqlStatementType::Ddl, "CREATE DATABASE"),
        Statement::AlterTable { .. } => (SqlStatementType::Ddl, "ALTER TABLE"),
        Statement::Drop { .. } => (SqlStatementType::Ddl, "DROP"),
        Statement::Truncate { .. } => (SqlStatementType::Ddl, "TRUNCATE"),

        // Administrative operations - BLOCKED
        Statement::Set(_) => (SqlStatementType::Administrative, "SET"),
        Statement::Use(_) => (SqlStatementType::Administrative, "USE"),
        Statement::Kill { .. } => (SqlStatementType::Administrative, "KILL"),
        Statement::OptimizeTable { .. } => (SqlStatementType::Administrative, "OPTIMIZE"),
        Statement::Grant { .. } => (SqlStatementType::Administrative, "GRANT"),
        Statement::Revoke { .. } => (SqlStatementType::Administrative, "REVOKE"),

        // Unknown/other statements - BLOCKED (conservative approach)
        _ => (SqlStatementType::Unknown, "Unknown"),
    }
}
