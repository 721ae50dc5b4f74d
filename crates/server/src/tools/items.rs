//! get_items, refresh_cache and get_item_by_id tool implementations.

use std::sync::Arc;

use flowsearch_core::{CacheStatus, Item, QueryEngine};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Input parameters for get_items tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetItemsParams {
    /// Bypass the cache and fetch from the content API.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Input parameters for get_item_by_id tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetItemByIdParams {
    /// Item identifier.
    pub id: String,
}

/// Output structure for get_items and refresh_cache tools.
#[derive(Debug, Clone, Serialize)]
pub struct ItemsOutput {
    pub count: usize,
    pub items: Vec<Item>,
    pub cache: CacheStatus,
}

/// Output structure for get_item_by_id tool.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutput {
    /// The item, or `null` when no item has this id.
    pub item: Option<Item>,
}

async fn items_output(engine: &QueryEngine, items: Arc<[Item]>) -> Result<CallToolResult, McpError> {
    let output = ItemsOutput { count: items.len(), items: items.to_vec(), cache: engine.cache().status().await };
    Ok(json_result(&output)?)
}

/// Implementation of the get_items tool.
pub async fn get_items_impl(engine: &QueryEngine, params: GetItemsParams) -> Result<CallToolResult, McpError> {
    let items = engine.get_items(params.force_refresh).await.map_err(ToolError::from)?;
    items_output(engine, items).await
}

/// Implementation of the refresh_cache tool.
pub async fn refresh_impl(engine: &QueryEngine) -> Result<CallToolResult, McpError> {
    let items = engine.refresh_cache().await.map_err(ToolError::from)?;
    tracing::info!(items = items.len(), "collection cache refreshed");
    items_output(engine, items).await
}

/// Implementation of the get_item_by_id tool.
pub async fn get_item_impl(engine: &QueryEngine, params: GetItemByIdParams) -> Result<CallToolResult, McpError> {
    if params.id.trim().is_empty() {
        return Err(ToolError::InvalidInput("id cannot be empty".into()).into());
    }

    let item = engine.get_item_by_id(&params.id).await.map_err(ToolError::from)?;

    Ok(json_result(&ItemOutput { item })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{engine, output_json};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_get_items_uses_cache() {
        let (engine, source) = engine(false);

        let first = output_json(&get_items_impl(&engine, GetItemsParams::default()).await.unwrap());
        let second = output_json(&get_items_impl(&engine, GetItemsParams::default()).await.unwrap());

        assert_eq!(first["count"], 2);
        assert_eq!(second["cache"]["fresh"], true);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_and_refresh_cache_fetch() {
        let (engine, source) = engine(false);

        get_items_impl(&engine, GetItemsParams::default()).await.unwrap();
        get_items_impl(&engine, GetItemsParams { force_refresh: true }).await.unwrap();
        let output = output_json(&refresh_impl(&engine).await.unwrap());

        assert_eq!(output["items"][1]["id"], "2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_get_items_error() {
        let (engine, _) = engine(true);
        let err = get_items_impl(&engine, GetItemsParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32013);
    }

    #[tokio::test]
    async fn test_get_item_by_id() {
        let (engine, _) = engine(false);

        let found = output_json(&get_item_impl(&engine, GetItemByIdParams { id: "2".into() }).await.unwrap());
        assert_eq!(found["item"]["name"], "Blue Hat");

        let missing = output_json(&get_item_impl(&engine, GetItemByIdParams { id: "404".into() }).await.unwrap());
        assert!(missing["item"].is_null());
    }

    #[tokio::test]
    async fn test_get_item_by_id_requires_exact_match() {
        let (engine, _) = engine(false);

        let padded = output_json(&get_item_impl(&engine, GetItemByIdParams { id: " 2 ".into() }).await.unwrap());
        assert!(padded["item"].is_null());
    }

    #[tokio::test]
    async fn test_get_item_by_id_empty() {
        let (engine, source) = engine(false);
        let result = get_item_impl(&engine, GetItemByIdParams { id: " ".into() }).await;
        assert!(result.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
