//! MCP tool implementations.
//!
//! This module contains all tools exposed by the flowsearch server.

pub mod items;
pub mod search_items;

pub use items::{GetItemByIdParams, GetItemsParams};
pub use search_items::SearchItemsParams;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::error::ToolError;

fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, ToolError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| ToolError::Internal(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
