//! Read-only enforcement through the public validation API.

use ch_analytics_mcp::db::sql_guard::validate_readonly;
use ch_analytics_mcp::error::AgentError;

fn assert_blocked(sql: &str) {
    match validate_readonly(sql) {
        Err(AgentError::ReadOnly { .. }) => {}
        other => panic!("expected read-only rejection for {sql:?}, got {other:?}"),
    }
}

#[test]
fn test_select_statements_are_allowed() {
    assert!(validate_readonly("SELECT 1").is_ok());
    assert!(validate_readonly("SELECT date, sum(clicks) FROM site_a GROUP BY date").is_ok());
    assert!(validate_readonly(
        "SELECT query, clicks FROM site_a WHERE dimensions = ['query'] ORDER BY clicks DESC LIMIT 100"
    )
    .is_ok());
}

#[test]
fn test_cte_and_subquery_selects_are_allowed() {
    assert!(validate_readonly(
        "WITH daily AS (SELECT date, sum(clicks) AS c FROM site_a GROUP BY date) \
         SELECT * FROM daily WHERE c > 10"
    )
    .is_ok());
    assert!(
        validate_readonly("SELECT * FROM (SELECT page FROM site_a) WHERE page LIKE '%/blog/%'")
            .is_ok()
    );
}

#[test]
fn test_introspection_statements_are_allowed() {
    assert!(validate_readonly("SHOW TABLES").is_ok());
    assert!(validate_readonly("DESCRIBE TABLE site_a").is_ok());
    assert!(validate_readonly("EXPLAIN SELECT 1").is_ok());
}

#[test]
fn test_dml_writes_are_blocked() {
    assert_blocked("INSERT INTO site_a (date, clicks) VALUES ('2024-01-01', 5)");
    assert_blocked("UPDATE site_a SET clicks = 0 WHERE date = '2024-01-01'");
    assert_blocked("DELETE FROM site_a WHERE clicks = 0");
}

#[test]
fn test_ddl_is_blocked() {
    assert_blocked("CREATE TABLE scratch (n Int64) ENGINE = Memory");
    assert_blocked("DROP TABLE site_a");
    assert_blocked("TRUNCATE TABLE site_a");
    assert_blocked("ALTER TABLE site_a ADD COLUMN extra String");
}

#[test]
fn test_clickhouse_mutations_are_blocked() {
    // ClickHouse spells mutations as ALTER TABLE ... DELETE / UPDATE
    assert!(validate_readonly("ALTER TABLE site_a DELETE WHERE clicks = 0").is_err());
    assert!(validate_readonly("ALTER TABLE site_a UPDATE clicks = 0 WHERE clicks < 0").is_err());
}

#[test]
fn test_administrative_statements_are_blocked() {
    assert_blocked("SET max_threads = 1");
    assert_blocked("GRANT SELECT ON site_a TO analyst");
    assert_blocked("OPTIMIZE TABLE site_a FINAL");
}

#[test]
fn test_unparseable_input_is_rejected() {
    assert!(validate_readonly("SELEKT * FORM site_a").is_err());
    assert!(validate_readonly("").is_err());
}
