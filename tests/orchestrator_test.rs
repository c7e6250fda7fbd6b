//! Integration tests for the query orchestrator.
//!
//! These tests drive `process` end to end against a mock ClickHouse HTTP
//! interface: metadata precondition, row cap, date normalization, and the
//! success and failure packaging paths.

use ch_analytics_mcp::agent::{Orchestrator, PRECONDITION_ERROR};
use ch_analytics_mcp::db::Gateway;
use ch_analytics_mcp::models::{ConnectionConfig, Protocol, ROW_CAP};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator_for(server: &MockServer) -> Orchestrator {
    let addr = server.address();
    let config = ConnectionConfig {
        protocol: Protocol::Http,
        host: addr.ip().to_string(),
        port: addr.port(),
        user: "analytics".to_string(),
        password: "secret".to_string(),
        database: "search_console".to_string(),
    };
    Orchestrator::new(Arc::new(Gateway::new(config, 30).expect("gateway")))
}

fn ch_body(meta: serde_json::Value, data: serde_json::Value) -> String {
    let rows = data.as_array().map(|a| a.len()).unwrap_or(0);
    serde_json::json!({ "meta": meta, "data": data, "rows": rows }).to_string()
}

/// Mount healthy schema_info and table_stats responses.
async fn mount_metadata(server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_string_contains("system.columns"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([
                {"name": "table", "type": "String"},
                {"name": "name", "type": "String"},
                {"name": "type", "type": "String"}
            ]),
            serde_json::json!([
                {"table": "site_a", "name": "date", "type": "Date32"},
                {"table": "site_a", "name": "clicks", "type": "Int64"}
            ]),
        )))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("system.tables"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([
                {"name": "table", "type": "String"},
                {"name": "row_count", "type": "Nullable(UInt64)"}
            ]),
            serde_json::json!([{"table": "site_a", "row_count": 1000}]),
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_select_one_end_to_end() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("SELECT 1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([{"name": "1", "type": "UInt8"}]),
            serde_json::json!([{"1": 1}]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("SELECT 1").await;

    assert_eq!(package.sql_query, "SELECT 1");
    assert_eq!(package.results.len(), 1);
    assert_eq!(package.results[0]["1"], serde_json::json!(1));
    assert!(!package.analysis.is_empty());
    assert!(package.analysis.contains('1'));
    assert!(package.error.is_none());
}

#[tokio::test]
async fn test_row_cap_returns_first_hundred_in_order() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    let data: Vec<serde_json::Value> = (0..250).map(|i| serde_json::json!({"n": i})).collect();
    Mock::given(method("POST"))
        .and(body_string_contains("big_table"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([{"name": "n", "type": "Int64"}]),
            serde_json::Value::Array(data),
        )))
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("SELECT n FROM big_table").await;

    assert!(package.error.is_none());
    assert_eq!(package.results.len(), ROW_CAP);
    assert_eq!(package.results[0]["n"], serde_json::json!(0));
    assert_eq!(package.results[ROW_CAP - 1]["n"], serde_json::json!(99));
}

#[tokio::test]
async fn test_datetime_values_are_normalized_to_iso8601() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("events"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([
                {"name": "ts", "type": "DateTime"},
                {"name": "clicks", "type": "Int64"}
            ]),
            serde_json::json!([{"ts": "2024-03-01 10:22:33", "clicks": 5}]),
        )))
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("SELECT ts, clicks FROM events").await;

    assert!(package.error.is_none());
    assert_eq!(package.results[0]["ts"], serde_json::json!("2024-03-01T10:22:33"));
    assert_eq!(package.results[0]["clicks"], serde_json::json!(5));
}

#[tokio::test]
async fn test_precondition_failure_skips_query_execution() {
    let server = MockServer::start().await;

    // Schema introspection fails; table stats would succeed
    Mock::given(method("POST"))
        .and(body_string_contains("system.columns"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Code: 516. Authentication failed"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("system.tables"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([{"name": "table", "type": "String"}]),
            serde_json::json!([{"table": "site_a"}]),
        )))
        .mount(&server)
        .await;

    // The user's query must never reach the store
    Mock::given(method("POST"))
        .and(body_string_contains("SELECT 1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("SELECT 1").await;

    assert_eq!(package.error.as_deref(), Some(PRECONDITION_ERROR));
    assert!(package.sql_query.is_empty());
    assert!(package.results.is_empty());
    assert!(package.analysis.is_empty());
}

#[tokio::test]
async fn test_rejected_query_echoes_sql_and_carries_error() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    let message = "Code: 60. DB::Exception: Table search_console.nonexistent_table does not exist.";
    Mock::given(method("POST"))
        .and(body_string_contains("nonexistent_table"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-clickhouse-exception-code", "60")
                .set_body_string(message),
        )
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("SELECT * FROM nonexistent_table").await;

    // The query was legitimately submitted, so it is echoed back
    assert_eq!(package.sql_query, "SELECT * FROM nonexistent_table");
    assert!(package.results.is_empty());
    assert!(package.analysis.is_empty());
    assert_eq!(package.error.as_deref(), Some(message));
}

#[tokio::test]
async fn test_zero_rows_yields_empty_analysis_without_error() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("empty_site"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ch_body(
            serde_json::json!([{"name": "clicks", "type": "Int64"}]),
            serde_json::json!([]),
        )))
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("SELECT clicks FROM empty_site").await;

    assert_eq!(package.sql_query, "SELECT clicks FROM empty_site");
    assert!(package.results.is_empty());
    assert!(package.analysis.is_empty());
    assert!(package.error.is_none());
}

#[tokio::test]
async fn test_write_statement_is_blocked_before_the_store() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    // No mock for the write: it must be rejected client-side
    let orchestrator = orchestrator_for(&server);
    let package = orchestrator.process("INSERT INTO site_a VALUES (1)").await;

    assert!(package.results.is_empty());
    assert!(package.error.as_deref().unwrap().contains("Read-only"));
}
