//! Webflow collection items response types and normalization.

use flowsearch_core::{Error, Item};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw body of `GET /collections/{id}/items`.
#[derive(Debug, Deserialize)]
pub struct ItemsEnvelope {
    #[serde(default)]
    pub items: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ItemsEnvelope {
    /// Normalize the raw records into items.
    ///
    /// Fails when the `items` field is absent. Records without an identifier
    /// are dropped with a warning.
    pub fn into_items(self) -> Result<Vec<Item>, Error> {
        let records = self
            .items
            .ok_or_else(|| Error::MalformedResponse("response has no `items` field".into()))?;

        let received = records.len();
        let items: Vec<Item> = records.into_iter().filter_map(Item::from_record).collect();

        if items.len() < received {
            tracing::warn!(skipped = received - items.len(), "dropped collection records without an identifier");
        }

        if let Some(total) = self.total
            && total > received as u64
        {
            tracing::debug!(total, received, "collection has more items than one page; only the first page is used");
        }

        Ok(items)
    }
}

/// Best message for a failed response: the API's own, else the reason phrase.
pub fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    parsed
        .msg
        .or(parsed.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}
