//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WEBFLOW_*)
//! 2. TOML config file (if WEBFLOW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheOptions, FallbackMode};

mod validation;

pub use validation::ConfigError;

/// Deployment environment. Missing credentials are fatal only in production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WEBFLOW_*)
/// 2. TOML config file (if WEBFLOW_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer token for the Webflow CMS API.
    ///
    /// Set via WEBFLOW_API_TOKEN environment variable.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Webflow site identifier.
    ///
    /// Set via WEBFLOW_SITE_ID environment variable.
    #[serde(default)]
    pub site_id: Option<String>,

    /// Collection whose items are searched.
    ///
    /// Set via WEBFLOW_COLLECTION_ID environment variable.
    #[serde(default)]
    pub collection_id: Option<String>,

    /// Base URL of the content API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Item fields consulted when matching a query.
    ///
    /// Set via WEBFLOW_SEARCH_FIELDS (comma-separated) or the config file.
    #[serde(default = "default_search_fields", deserialize_with = "validation::string_list")]
    pub search_fields: Vec<String>,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How long fetched items stay fresh, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Stale-data fallback policy.
    #[serde(default)]
    pub fallback: FallbackMode,

    /// Set via WEBFLOW_ENVIRONMENT (`development` or `production`).
    #[serde(default)]
    pub environment: Environment,
}

fn default_api_base_url() -> String {
    "https://api.webflow.com".into()
}

fn default_search_fields() -> Vec<String> {
    vec!["name".into(), "description".into(), "category".into()]
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_user_agent() -> String {
    "flowsearch/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            site_id: None,
            collection_id: None,
            api_base_url: default_api_base_url(),
            search_fields: default_search_fields(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            user_agent: default_user_agent(),
            fallback: FallbackMode::default(),
            environment: Environment::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Cache tuning derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions { ttl: self.cache_ttl(), timeout: self.timeout(), fallback: self.fallback }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WEBFLOW_`
    /// 2. TOML file from `WEBFLOW_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WEBFLOW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WEBFLOW_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
