//! flowsearch server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use flowsearch_client::{WebflowClient, WebflowConfig};
use flowsearch_core::{AppConfig, CollectionCache, QueryEngine};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
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

    tracing::info!(
        collection = config.collection_id.as_deref().unwrap_or_default(),
        fallback = ?config.fallback,
        "Starting flowsearch server on stdio transport"
    );

    let client = WebflowClient::new(WebflowConfig::from(&config))?;
    let cache = CollectionCache::new(Arc::new(client), config.cache_options());
    let engine = QueryEngine::new(cache, config.search_fields.clone());

    let handler = handler::FlowSearchServer::new(engine);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
