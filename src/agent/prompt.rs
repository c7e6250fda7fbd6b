//! Prompt construction.
//!
//! Two pieces of text leave this crate: the fixed analysis prompt embedded
//! in every successful [`AnalysisPackage`](crate::models::AnalysisPackage),
//! and the server instructions that steer the calling language model. Both
//! live here.

use crate::models::Row;

/// Build the fixed analysis prompt embedding the capped, normalized results.
pub fn analysis_prompt(results: &[Row]) -> String {
    let rendered = serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Analyze these results and provide:\n\
         1. Key findings\n\
         2. Notable trends\n\
         3. Business implications\n\
         4. Areas for investigation\n\
         \n\
         Results: {rendered}"
    )
}

/// Steering instructions for the calling language model, surfaced through
/// the MCP server info. The non-negotiable rules here (dimensions filter,
/// 100-row cap, read-only statements, site-name translation) are also
/// enforced in code; the text exists so the model writes queries that pass
/// on the first try.
pub const AGENT_INSTRUCTIONS: &str = "\
You are a helpful assistant that answers questions about website traffic, \
user behavior, and search performance by writing ClickHouse SQL.\n\
\n\
## Workflow\n\
1. Call `table_stats` (or `list_sites`) to discover the available tables.\n\
2. Call `schema_info` if you need column names and types.\n\
3. Write a SQL query and pass it to `process_query`.\n\
4. Use the returned analysis prompt to interpret the results for the user.\n\
\n\
## Data schema (Google Search Console rollups)\n\
- date: Date32 - when search data was recorded\n\
- query: Nullable(String) - the search term users typed\n\
- page: Nullable(String) - the URL shown in search results\n\
- device: LowCardinality(Nullable(String)) - mobile, desktop, tablet\n\
- country: LowCardinality(Nullable(String)) - where the search originated\n\
- clicks: Int64 - clicks from search results (represents visitors)\n\
- impressions: Int64 - times the page appeared in search\n\
- ctr: Float64 - click-through rate\n\
- position: Float64 - average position in search results\n\
\n\
## Mandatory query rules\n\
- EVERY query MUST filter on the `dimensions` column as the FIRST condition \
in the WHERE clause, using exact syntax: dimensions = 'DIMENSION_NAME'.\n\
- Valid combinations: DATE, DATE_QUERY, DATE_PAGE, DATE_DEVICE, \
DATE_COUNTRY, DATE_QUERY_PAGE, DATE_QUERY_DEVICE, DATE_QUERY_COUNTRY, \
DATE_PAGE_DEVICE, DATE_PAGE_COUNTRY, DATE_DEVICE_COUNTRY, \
DATE_QUERY_PAGE_DEVICE, DATE_QUERY_PAGE_COUNTRY, \
DATE_QUERY_DEVICE_COUNTRY, DATE_PAGE_DEVICE_COUNTRY, \
DATE_QUERY_PAGE_DEVICE_COUNTRY. Pick the most specific combination that \
covers the fields you group by.\n\
- For visitor counts, use sum(clicks). Never countDistinct(query).\n\
- Always include LIMIT 100. Results are capped at 100 rows server-side \
regardless of what you request.\n\
- Use exact table names from `table_stats`. Never add a database prefix.\n\
- Only read queries are accepted; writes and DDL are rejected.\n\
\n\
## Table names\n\
Internal table names encode the site URL, e.g. \
https___www_bulkco_co_uk__68247968d25f3661a88a24ac is www.bulkco.co.uk. \
Never show internal names to users; `list_sites` returns the readable \
names alongside the internal ones. When asked which websites are \
available, call `list_sites`.\n\
\n\
## Errors\n\
If a query fails, the error field carries the ClickHouse message. Check the \
dimensions filter, the table name, and the SQL syntax, then explain the \
problem to the user in plain language.";
