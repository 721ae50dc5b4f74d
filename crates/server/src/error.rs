//! Structured errors for the flowsearch server.
//!
//! Maps core fetch errors onto MCP error codes.

use flowsearch_core::Error;
use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde_json::json;

/// Shown to the caller when a search cannot be answered at all.
pub const RETRY_MESSAGE: &str = "Failed to fetch suggestions. Please try again.";

/// Structured errors for the flowsearch server.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., empty id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The collection could not be fetched.
    #[error(transparent)]
    Fetch(#[from] Error),

    /// The tool output could not be encoded.
    #[error("INTERNAL_ERROR: {0}")]
    Internal(String),

    /// A search failed with no cached items to fall back on.
    #[error("SEARCH_UNAVAILABLE: {0}")]
    SearchUnavailable(Error),
}

fn fetch_code(err: &Error) -> i32 {
    match err {
        Error::InvalidInput(_) => -32602,
        Error::Timeout(_) => -32006,
        Error::Upstream { .. } => -32008,
        Error::Network(_) => -32013,
        Error::MalformedResponse(_) => -32014,
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let (code, message, data) = match &err {
            ToolError::InvalidInput(msg) => (-32602, msg.clone(), None),
            ToolError::Internal(msg) => (-32603, msg.clone(), None),
            ToolError::Fetch(e) => (fetch_code(e), e.to_string(), Some(json!({ "kind": e.code() }))),
            ToolError::SearchUnavailable(e) => {
                (fetch_code(e), RETRY_MESSAGE.to_string(), Some(json!({ "kind": e.code(), "detail": e.to_string() })))
            }
        };

        McpError { code: ErrorCode(code), message: message.into(), data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_codes() {
        let err: McpError = ToolError::from(Error::Timeout("10s".into())).into();
        assert_eq!(err.code.0, -32006);

        let err: McpError = ToolError::from(Error::Upstream { status: 401, message: "bad token".into() }).into();
        assert_eq!(err.code.0, -32008);
        assert!(err.message.contains("bad token"));
    }

    #[test]
    fn test_search_unavailable_uses_retry_message() {
        let err: McpError = ToolError::SearchUnavailable(Error::Network("refused".into())).into();
        assert_eq!(err.code.0, -32013);
        assert_eq!(err.message, RETRY_MESSAGE);
        assert_eq!(err.data.unwrap()["kind"], "NETWORK_ERROR");
    }

    #[test]
    fn test_internal_error_code() {
        let err: McpError = ToolError::Internal("Failed to serialize output".into()).into();
        assert_eq!(err.code.0, -32603);
    }

    #[test]
    fn test_invalid_input() {
        let err: McpError = ToolError::InvalidInput("id cannot be empty".into()).into();
        assert_eq!(err.code.0, -32602);
    }
}
