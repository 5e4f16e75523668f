//! Post-load checks on [`AppConfig`].

use crate::config::AppConfig;
use thiserror::Error;

/// Failure to load or accept a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn require_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::Invalid { field: field.into(), reason: format!("not a URL: {e}") })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::Invalid { field: field.into(), reason: format!("unsupported scheme: {scheme}") }),
    }
}

impl AppConfig {
    /// Reject settings the scraper cannot run with.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` naming the first offending field when:
    /// - `base_url` or `site_origin` is not an http(s) URL
    /// - `pages` is 0
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_redirects` exceeds 20
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url("base_url", &self.base_url)?;
        require_http_url("site_origin", &self.site_origin)?;

        if self.pages == 0 {
            return Err(ConfigError::Invalid { field: "pages".into(), reason: "must be at least 1".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_redirects > 20 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 20".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.base_url.ends_with('/') {
            tracing::warn!(
                base_url = %self.base_url,
                "base_url ends with '/'; page URLs will contain a double slash"
            );
        }

        Ok(())
    }
}
