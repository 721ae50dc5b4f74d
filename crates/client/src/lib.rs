//! Client code for flowsearch.
//!
//! This crate provides the HTTP client for the Webflow CMS collection items
//! endpoint, plugged into the core cache as a `CollectionSource`.

pub mod webflow;

pub use webflow::{WebflowClient, WebflowConfig};
