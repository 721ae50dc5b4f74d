//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::config::{AppConfig, Environment};

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

/// Fields that must be present in production.
const REQUIRED: &[(&str, &str)] = &[
    ("api_token", "WEBFLOW_API_TOKEN"),
    ("site_id", "WEBFLOW_SITE_ID"),
    ("collection_id", "WEBFLOW_COLLECTION_ID"),
];

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `cache_ttl_secs` is 0
    /// - `search_fields` or `user_agent` is empty
    /// - `api_base_url` is not an http(s) URL
    ///
    /// Returns `ConfigError::Missing` for absent credentials when running in
    /// production; elsewhere they are only logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be at least 1".into() });
        }

        if self.search_fields.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "search_fields".into(), reason: "must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.api_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "api_base_url".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "api_base_url".into(), reason: e.to_string() });
            }
        }

        let missing = self.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|(_, var)| *var).collect();
            if self.environment == Environment::Production {
                return Err(ConfigError::Missing {
                    field: missing.iter().map(|(f, _)| *f).collect::<Vec<_>>().join(", "),
                    hint: format!("Set {}", names.join(", ")),
                });
            }
            tracing::warn!(missing = %names.join(", "), "missing required environment variables");
        }

        Ok(())
    }

    fn missing_required(&self) -> Vec<(&'static str, &'static str)> {
        REQUIRED
            .iter()
            .filter(|(field, _)| {
                let value = match *field {
                    "api_token" => &self.api_token,
                    "site_id" => &self.site_id,
                    _ => &self.collection_id,
                };
                value.as_deref().is_none_or(str::is_empty)
            })
            .copied()
            .collect()
    }
}

/// Accept either a list or a comma-separated string.
pub(super) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    let list = match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(list.into_iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect())
}
