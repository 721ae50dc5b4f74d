//! In-memory cache of a remote collection.
//!
//! Holds the last fetched snapshot of a collection and coordinates fetches so
//! that at most one request to the content API is outstanding at a time:
//!
//! - Fresh snapshots (younger than the TTL) are served without a network call
//! - Concurrent callers during a fetch share that fetch's single outcome
//! - Fetches are bounded by a timeout; a timed-out initiator may fall back to
//!   the previous snapshot

pub mod collection;
pub mod source;

pub use crate::Error;

pub use collection::{CacheOptions, CacheStatus, CollectionCache, FallbackMode};
pub use source::CollectionSource;
