//! mcp-loaders server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use routeloader_client::LoaderClient;
use routeloader_core::{AppConfig, LoaderCache};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let client = LoaderClient::new(&config)?.with_cache(LoaderCache::global().clone());

    tracing::info!(origin = %config.origin, "Starting mcp-loaders server on stdio transport");

    let handler = handler::McpLoaderServer::new(client);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
