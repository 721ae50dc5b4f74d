//! Webflow CMS API client.
//!
//! Fetches the items of one CMS collection and normalizes them into
//! [`Item`](flowsearch_core::Item) records.
//!
//! ### Protocol
//!
//! - **Endpoint**: `{base_url}/collections/{collection_id}/items`
//! - **Authentication**: `authorization: Bearer {api_token}`
//! - **Versioning**: `accept-version: 1.0.0`
//! - **Timeouts**: Surface as `Error::Timeout`, so the cache can fall back.
//! - **Errors**: Non-2xx becomes `Error::Upstream` with the API's `msg`; a
//!   body without `items` becomes `Error::MalformedResponse`.

pub mod response;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use flowsearch_core::{AppConfig, CollectionSource, Error, Item};
use reqwest::header;
use url::Url;

use response::{ItemsEnvelope, upstream_message};

/// Default base URL for the Webflow API.
const DEFAULT_BASE_URL: &str = "https://api.webflow.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "flowsearch/0.1";

/// Value of the `accept-version` header.
const API_VERSION: &str = "1.0.0";

/// Webflow client configuration.
#[derive(Debug, Clone)]
pub struct WebflowConfig {
    /// Bearer token from WEBFLOW_API_TOKEN.
    pub api_token: String,
    /// Collection whose items are listed.
    pub collection_id: String,
    /// Base URL (default: https://api.webflow.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: flowsearch/0.x).
    pub user_agent: String,
}

impl Default for WebflowConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            collection_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WebflowConfig {
    /// Check that the token and collection id are set before a request is made.
    pub fn require_credentials(&self) -> Result<(), Error> {
        if self.api_token.is_empty() {
            return Err(Error::InvalidInput("api_token is missing: set WEBFLOW_API_TOKEN".into()));
        }
        if self.collection_id.is_empty() {
            return Err(Error::InvalidInput("collection_id is missing: set WEBFLOW_COLLECTION_ID".into()));
        }
        Ok(())
    }
}

impl From<&AppConfig> for WebflowConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_token: config.api_token.clone().unwrap_or_default(),
            collection_id: config.collection_id.clone().unwrap_or_default(),
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Webflow CMS API client.
#[derive(Debug, Clone)]
pub struct WebflowClient {
    http: reqwest::Client,
    config: WebflowConfig,
    endpoint: Url,
}

impl WebflowClient {
    /// Create a new Webflow client with the given configuration.
    pub fn new(config: WebflowConfig) -> Result<Self, Error> {
        let endpoint = Self::items_url(&config.base_url, &config.collection_id)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, endpoint })
    }

    /// Build the items endpoint for a collection.
    pub fn items_url(base_url: &str, collection_id: &str) -> Result<Url, Error> {
        let mut url = Url::parse(base_url).map_err(|e| Error::InvalidInput(format!("invalid base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::InvalidInput(format!("base URL cannot have a path: {}", base_url)))?
            .pop_if_empty()
            .extend(["collections", collection_id, "items"]);

        Ok(url)
    }

    /// Fetch every item of the configured collection in one request.
    ///
    /// Fails with `Error::InvalidInput` without sending anything when the token
    /// or collection id is not configured.
    pub async fn list_items(&self) -> Result<Vec<Item>, Error> {
        self.config.require_credentials()?;
        let start = Instant::now();

        tracing::debug!("fetching Webflow collection: collection={}", self.config.collection_id);

        let http_response = self
            .http
            .get(self.endpoint.clone())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_token))
            .header("accept-version", API_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = http_response.status();
        tracing::debug!("Webflow API response status: {}", status);

        if !status.is_success() {
            let body = http_response.bytes().await.unwrap_or_default();
            return Err(Error::Upstream { status: status.as_u16(), message: upstream_message(status, &body) });
        }

        let bytes = http_response.bytes().await.map_err(transport_error)?;
        let envelope: ItemsEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        let items = envelope.into_items()?;

        tracing::debug!("collection fetched in {:?}, {} items", start.elapsed(), items.len());

        Ok(items)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() { Error::Timeout(err.to_string()) } else { Error::Network(err.to_string()) }
}

#[async_trait]
impl CollectionSource for WebflowClient {
    fn name(&self) -> &str {
        "webflow"
    }

    async fn fetch_items(&self) -> Result<Vec<Item>, Error> {
        self.list_items().await
    }
}
