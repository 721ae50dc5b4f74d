//! Query engine on top of the collection cache.

use std::sync::Arc;

use super::{Query, filter_items};
use crate::{CollectionCache, Error, Item};

/// Answers search queries against a [`CollectionCache`].
#[derive(Clone)]
pub struct QueryEngine {
    cache: CollectionCache,
    search_fields: Arc<[String]>,
}

impl QueryEngine {
    pub fn new(cache: CollectionCache, search_fields: Vec<String>) -> Self {
        Self { cache, search_fields: search_fields.into() }
    }

    pub fn cache(&self) -> &CollectionCache {
        &self.cache
    }

    /// Return the items matching every term of `query`.
    ///
    /// Blank queries return nothing and never touch the cache. If the fetch
    /// fails and a previous snapshot exists, the snapshot is searched instead
    /// (unless the cache runs in strict mode).
    pub async fn search_items(&self, query: &str) -> Result<Vec<Item>, Error> {
        let Some(query) = Query::parse(query) else {
            return Ok(Vec::new());
        };

        let items = match self.cache.get_items(false).await {
            Ok(items) => items,
            Err(err) if self.cache.options().fallback.search_fallback() => {
                let stale = self.cache.cached_items().await;
                if stale.is_empty() {
                    return Err(err);
                }
                tracing::warn!(error = %err, items = stale.len(), "searching stale items after fetch error");
                stale
            }
            Err(err) => return Err(err),
        };

        let results = filter_items(&items, &query, &self.search_fields);
        tracing::debug!(terms = ?query.terms(), matches = results.len(), "search completed");

        Ok(results)
    }

    pub async fn get_items(&self, force_refresh: bool) -> Result<Arc<[Item]>, Error> {
        self.cache.get_items(force_refresh).await
    }

    pub async fn refresh_cache(&self) -> Result<Arc<[Item]>, Error> {
        self.cache.refresh_cache().await
    }

    pub async fn get_item_by_id(&self, id: &str) -> Result<Option<Item>, Error> {
        self.cache.get_item_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedSource, catalog};
    use crate::{CacheOptions, CollectionSource, FallbackMode};
    use std::time::Duration;

    fn engine(source: &Arc<ScriptedSource>, fallback: FallbackMode) -> QueryEngine {
        let source: Arc<dyn CollectionSource> = source.clone();
        let cache = CollectionCache::new(source, CacheOptions { fallback, ..Default::default() });
        QueryEngine::new(cache, vec!["name".into(), "description".into(), "category".into()])
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_skips_fetch() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)).then_ok(catalog()));
        let engine = engine(&source, FallbackMode::Defensive);

        assert!(engine.search_items("").await.unwrap().is_empty());
        assert!(engine.search_items("   ").await.unwrap().is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_populates_cache() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)).then_ok(catalog()));
        let engine = engine(&source, FallbackMode::Defensive);

        let hits = engine.search_items("red shoe").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(engine.search_items("red hat").await.unwrap().is_empty());
        assert_eq!(engine.search_items("  RED  ").await.unwrap(), engine.search_items("red").await.unwrap());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_fallback_after_failed_refresh() {
        let source = Arc::new(
            ScriptedSource::new(Duration::from_millis(10))
                .then_ok(catalog())
                .then_err(Error::Upstream { status: 503, message: "Service Unavailable".into() })
                .then_err(Error::Network("connection reset".into())),
        );
        let engine = engine(&source, FallbackMode::Defensive);
        engine.get_items(false).await.unwrap();

        assert!(engine.refresh_cache().await.is_err());

        tokio::time::advance(Duration::from_secs(301)).await;
        let hits = engine.search_items("blue").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Blue Hat");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_without_cached_items_propagates() {
        let source = Arc::new(
            ScriptedSource::new(Duration::from_millis(10))
                .then_err(Error::Network("dns failure".into()))
                .then_err(Error::Network("dns failure".into())),
        );
        let engine = engine(&source, FallbackMode::Defensive);

        assert!(engine.search_items("red").await.unwrap_err().is_network());
        assert!(engine.get_items(false).await.unwrap_err().is_network());
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_mode_search_propagates() {
        let source = Arc::new(
            ScriptedSource::new(Duration::from_millis(10))
                .then_ok(catalog())
                .then_err(Error::MalformedResponse("missing items".into())),
        );
        let engine = engine(&source, FallbackMode::Strict);
        engine.get_items(false).await.unwrap();

        tokio::time::advance(Duration::from_secs(301)).await;
        let err = engine.search_items("red").await.unwrap_err();
        assert_eq!(err.code(), "MALFORMED_RESPONSE");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_item_by_id_delegates() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)).then_ok(catalog()));
        let engine = engine(&source, FallbackMode::Defensive);

        assert_eq!(engine.get_item_by_id("1").await.unwrap().unwrap().name, "Red Shoe");
        assert!(engine.get_item_by_id("missing").await.unwrap().is_none());
    }
}
