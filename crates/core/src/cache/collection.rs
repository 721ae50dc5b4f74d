//! Collection snapshot with TTL expiry and single-flight fetching.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::source::CollectionSource;
use crate::{Error, Item};

/// Default freshness window for a fetched snapshot (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default bound on a single fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

type Items = Arc<[Item]>;
type SharedFetch = Shared<BoxFuture<'static, Result<Items, Error>>>;

/// Stale-data fallback policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// A timed-out fetch initiator gets the previous snapshot, and search
    /// falls back to the previous snapshot on any fetch error.
    #[default]
    Defensive,
    /// Every fetch error propagates.
    Strict,
}

impl FallbackMode {
    /// Whether the caller that started a failed fetch may answer from the
    /// previous snapshot.
    pub fn initiator_fallback(self, err: &Error) -> bool {
        self == FallbackMode::Defensive && err.is_timeout()
    }

    /// Whether search may filter the previous snapshot after a fetch error.
    pub fn search_fallback(self) -> bool {
        self == FallbackMode::Defensive
    }
}

/// Cache tuning.
#[derive(Debug, Clone, Copy)]
pub struct CacheOptions {
    pub ttl: Duration,
    pub timeout: Duration,
    pub fallback: FallbackMode,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, timeout: DEFAULT_TIMEOUT, fallback: FallbackMode::default() }
    }
}

/// Point-in-time view of the cache for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub item_count: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub fresh: bool,
    pub fetching: bool,
}

struct CacheState {
    items: Items,
    fetched_at: Option<Instant>,
    fetched_at_utc: Option<DateTime<Utc>>,
    in_flight: Option<SharedFetch>,
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.items.is_empty() && self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }
}

/// Cached snapshot of one remote collection.
///
/// Cloning is cheap and clones share the same snapshot and in-flight fetch.
#[derive(Clone)]
pub struct CollectionCache {
    source: Arc<dyn CollectionSource>,
    state: Arc<Mutex<CacheState>>,
    options: CacheOptions,
}

impl CollectionCache {
    pub fn new(source: Arc<dyn CollectionSource>, options: CacheOptions) -> Self {
        let state = CacheState {
            items: Arc::from(Vec::<Item>::new()),
            fetched_at: None,
            fetched_at_utc: None,
            in_flight: None,
        };
        Self { source, state: Arc::new(Mutex::new(state)), options }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Return the collection's items, fetching only when needed.
    ///
    /// A fresh snapshot is returned as is unless `force_refresh` is set. When a
    /// fetch is already outstanding the caller waits for it and receives the
    /// same outcome as every other waiter; otherwise this call starts one.
    pub async fn get_items(&self, force_refresh: bool) -> Result<Items, Error> {
        let (fetch, previous) = {
            let mut state = self.state.lock().await;

            if !force_refresh && state.is_fresh(self.options.ttl) {
                tracing::debug!(items = state.items.len(), "collection cache hit");
                return Ok(Arc::clone(&state.items));
            }

            match &state.in_flight {
                Some(fetch) => {
                    tracing::debug!(source = self.source.name(), "joining in-flight collection fetch");
                    (fetch.clone(), None)
                }
                None => {
                    let fetch = self.start_fetch();
                    state.in_flight = Some(fetch.clone());
                    (fetch, Some(Arc::clone(&state.items)))
                }
            }
        };

        match fetch.await {
            Ok(items) => Ok(items),
            Err(err) => match previous {
                Some(stale) if !stale.is_empty() && self.options.fallback.initiator_fallback(&err) => {
                    tracing::warn!(error = %err, items = stale.len(), "collection fetch timed out, serving stale items");
                    Ok(stale)
                }
                _ => Err(err),
            },
        }
    }

    /// Fetch unconditionally, replacing the snapshot on success.
    pub async fn refresh_cache(&self) -> Result<Items, Error> {
        self.get_items(true).await
    }

    /// Look up one item by identifier. Unknown ids yield `Ok(None)`.
    pub async fn get_item_by_id(&self, id: &str) -> Result<Option<Item>, Error> {
        let items = self.get_items(false).await?;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    /// The current snapshot, fresh or not, without touching the network.
    pub async fn cached_items(&self) -> Items {
        Arc::clone(&self.state.lock().await.items)
    }

    /// Mark the snapshot stale. Items are kept for fallback.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.fetched_at = None;
    }

    pub async fn status(&self) -> CacheStatus {
        let state = self.state.lock().await;
        CacheStatus {
            item_count: state.items.len(),
            fetched_at: state.fetched_at_utc,
            fresh: state.is_fresh(self.options.ttl),
            fetching: state.in_flight.is_some(),
        }
    }

    /// Spawn the fetch and return a shared handle to its outcome.
    ///
    /// The task records its own outcome and clears the in-flight slot, so the
    /// fetch runs to completion even when every waiter has gone away.
    fn start_fetch(&self) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let timeout = self.options.timeout;

        let task = tokio::spawn(async move {
            let start = Instant::now();
            tracing::debug!(source = source.name(), "fetching collection items");

            let result = match tokio::time::timeout(timeout, source.fetch_items()).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(format!("no response within {}ms", timeout.as_millis()))),
            };

            let mut state = state.lock().await;
            state.in_flight = None;

            match result {
                Ok(items) => {
                    let items: Items = items.into();
                    tracing::debug!(
                        source = source.name(),
                        items = items.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "collection fetch completed"
                    );
                    state.items = Arc::clone(&items);
                    state.fetched_at = Some(Instant::now());
                    state.fetched_at_utc = Some(Utc::now());
                    Ok(items)
                }
                Err(err) => {
                    tracing::warn!(source = source.name(), error = %err, "collection fetch failed");
                    Err(err)
                }
            }
        });

        let state = Arc::clone(&self.state);
        async move {
            match task.await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(error = %err, "collection fetch task aborted");
                    state.lock().await.in_flight = None;
                    Err(Error::Network(format!("collection fetch task aborted: {err}")))
                }
            }
        }
        .boxed()
        .shared()
    }
}
