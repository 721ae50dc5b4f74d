//! Core types and shared functionality for flowsearch.
//!
//! This crate provides:
//! - The collection item model
//! - An in-memory collection cache with single-flight fetching
//! - The conjunctive substring query engine
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod item;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheOptions, CacheStatus, CollectionCache, CollectionSource, FallbackMode};
pub use config::{AppConfig, ConfigError, Environment};
pub use error::Error;
pub use item::Item;
pub use search::{Query, QueryEngine, filter_items};
