//! search_items tool implementation.
//!
//! Predictive search over the cached collection.

use flowsearch_core::{Item, QueryEngine};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Input parameters for search_items tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchItemsParams {
    /// Search text. Every whitespace-separated term must match.
    pub query: String,
}

/// Output structure for search_items tool.
#[derive(Debug, Clone, Serialize)]
pub struct SearchItemsOutput {
    /// The query as received.
    pub query: String,
    /// Number of matching items.
    pub count: usize,
    /// Matching items in collection order.
    pub results: Vec<Item>,
    /// Human-readable note for an empty result set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Implementation of the search_items tool.
pub async fn search_impl(engine: &QueryEngine, params: SearchItemsParams) -> Result<CallToolResult, McpError> {
    let results = engine.search_items(&params.query).await.map_err(ToolError::SearchUnavailable)?;

    let message = (results.is_empty() && !params.query.trim().is_empty())
        .then(|| format!("No results found for \"{}\"", params.query.trim()));

    let output = SearchItemsOutput { count: results.len(), query: params.query, results, message };

    Ok(json_result(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RETRY_MESSAGE;
    use crate::tools::test_support::{engine, output_json};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_search_returns_matches() {
        let (engine, _) = engine(false);
        let params = SearchItemsParams { query: "red shoe".into() };

        let result = search_impl(&engine, params).await.unwrap();
        let output = output_json(&result);

        assert_eq!(output["count"], 1);
        assert_eq!(output["results"][0]["name"], "Red Shoe");
        assert!(output.get("message").is_none());
    }

    #[tokio::test]
    async fn test_search_no_results_message() {
        let (engine, _) = engine(false);
        let params = SearchItemsParams { query: " red hat ".into() };

        let output = output_json(&search_impl(&engine, params).await.unwrap());

        assert_eq!(output["count"], 0);
        assert_eq!(output["message"], "No results found for \"red hat\"");
    }

    #[tokio::test]
    async fn test_blank_query_has_no_message_and_no_fetch() {
        let (engine, source) = engine(false);
        let params = SearchItemsParams { query: "   ".into() };

        let output = output_json(&search_impl(&engine, params).await.unwrap());

        assert_eq!(output["count"], 0);
        assert!(output.get("message").is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_failure_uses_retry_message() {
        let (engine, _) = engine(true);
        let params = SearchItemsParams { query: "red".into() };

        let err = search_impl(&engine, params).await.unwrap_err();
        assert_eq!(err.message, RETRY_MESSAGE);
    }
}
