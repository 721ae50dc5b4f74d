//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    GetItemByIdParams, GetItemsParams, SearchItemsParams,
    items::{get_item_impl, get_items_impl, refresh_impl},
    search_items::search_impl,
};

use flowsearch_core::QueryEngine;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for flowsearch.
#[derive(Clone)]
pub struct FlowSearchServer {
    engine: QueryEngine,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FlowSearchServer {
    /// Create a new server handler.
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine, tool_router: Self::tool_router() }
    }

    /// Predictive search over the collection.
    #[tool(
        description = "Search collection items. Every whitespace-separated term must appear in the name, description or category. Blank queries return no results."
    )]
    async fn search_items(&self, params: Parameters<SearchItemsParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.engine, params.0).await
    }

    #[tool(description = "List all collection items, served from cache while fresh. Set force_refresh to bypass the cache.")]
    async fn get_items(&self, params: Parameters<GetItemsParams>) -> Result<CallToolResult, McpError> {
        get_items_impl(&self.engine, params.0).await
    }

    #[tool(description = "Fetch the collection from the content API and replace the cached items.")]
    async fn refresh_cache(&self) -> Result<CallToolResult, McpError> {
        refresh_impl(&self.engine).await
    }

    #[tool(description = "Look up one collection item by id. Returns a null item when the id is unknown.")]
    async fn get_item_by_id(&self, params: Parameters<GetItemByIdParams>) -> Result<CallToolResult, McpError> {
        get_item_impl(&self.engine, params.0).await
    }
}

impl ServerHandler for FlowSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "flowsearch".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::engine;

    #[test]
    fn test_lists_all_tools() {
        let (engine, _) = engine(false);
        let server = FlowSearchServer::new(engine);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();

        assert_eq!(names, vec!["get_item_by_id", "get_items", "refresh_cache", "search_items"]);
    }

    #[test]
    fn test_server_info() {
        let (engine, _) = engine(false);
        let info = FlowSearchServer::new(engine).get_info();
        assert_eq!(info.server_info.name, "flowsearch");
    }
}
