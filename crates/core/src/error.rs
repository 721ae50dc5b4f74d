//! Unified error types for flowsearch.
//!
//! Every failure of the remote collection fetch is reported through [`Error`].
//! The enum is `Clone` because a single fetch outcome is handed to every caller
//! that waited on it.

/// Unified error types for the collection cache and query engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., bad base URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Connection-level failure before a response arrived.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The fetch did not complete within the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// The content API answered with a non-2xx status.
    #[error("UPSTREAM_ERROR: status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("MALFORMED_RESPONSE: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Network(_) => "NETWORK_ERROR",
            Error::Timeout(_) => "FETCH_TIMEOUT",
            Error::Upstream { .. } => "UPSTREAM_ERROR",
            Error::MalformedResponse(_) => "MALFORMED_RESPONSE",
        }
    }

    /// Whether this is a network-kind failure (connection error or timeout).
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
