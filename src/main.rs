//! ClickHouse Analytics MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to answer natural-language questions about website analytics data stored
//! in ClickHouse.

use ch_analytics_mcp::config::{Config, TransportMode};
use ch_analytics_mcp::db::Gateway;
use ch_analytics_mcp::transport::{HttpTransport, StdioTransport, Transport};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting ClickHouse Analytics MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Build the gateway. No network traffic happens here: the connection is
    // exercised lazily, so a missing CLICKHOUSE_HOST shows up as a failed
    // outcome on the first query rather than a startup crash.
    let gateway = Arc::new(Gateway::new(
        config.connection_config(),
        config.query_timeout_secs,
    )?);

    info!(target = %gateway.masked_endpoint(), "Gateway configured");

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(gateway, config.model.clone());
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                gateway,
                config.model.clone(),
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
