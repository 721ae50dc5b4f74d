//! The seam between the cache and whatever produces collection items.

use async_trait::async_trait;

use crate::{Error, Item};

/// Produces the full item list of one remote collection.
///
/// Implementations perform a single request per call and never cache; caching
/// and coalescing are the job of [`CollectionCache`](super::CollectionCache).
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &str;

    /// Fetch every item of the collection.
    async fn fetch_items(&self) -> Result<Vec<Item>, Error>;
}
