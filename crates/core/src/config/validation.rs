//! Post-load checks for `AppConfig`.
//!
//! Every source (defaults, TOML file, environment) is merged before these
//! run, so a bad value is reported against the field name regardless of
//! where it came from.

use std::ops::RangeInclusive;

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

const MAX_BYTES_RANGE: RangeInclusive<usize> = 1..=50 * 1024 * 1024;
const TIMEOUT_MS_RANGE: RangeInclusive<u64> = 100..=300_000;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field:
    /// - `origin` must be an absolute http(s) URL with a host
    /// - `max_bytes` must be within 1 byte..=50MB
    /// - `timeout_ms` must be within 100..=300000
    /// - `user_agent` must not be blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = Url::parse(&self.origin).map_err(|e| invalid("origin", e.to_string()))?;
        if !matches!(origin.scheme(), "http" | "https") || !origin.has_host() {
            return Err(invalid("origin", format!("expected an http(s) origin, got {origin}")));
        }
        if origin.path() != "/" || origin.query().is_some() {
            tracing::warn!(origin = %self.origin, "origin path and query are ignored for loader requests");
        }

        if !MAX_BYTES_RANGE.contains(&self.max_bytes) {
            return Err(invalid("max_bytes", format!("{} is outside 1..=52428800", self.max_bytes)));
        }

        if !TIMEOUT_MS_RANGE.contains(&self.timeout_ms) {
            return Err(invalid("timeout_ms", format!("{} is outside 100..=300000", self.timeout_ms)));
        }

        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_field(config: AppConfig) -> Option<String> {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_origin_must_be_http() {
        for origin in ["not a url", "ftp://example.com", "file:///tmp/app"] {
            let config = AppConfig { origin: origin.into(), ..Default::default() };
            assert_eq!(rejected_field(config).as_deref(), Some("origin"), "{origin}");
        }
    }

    #[test]
    fn test_origin_path_is_tolerated() {
        let config = AppConfig { origin: "https://example.com/app?x=1".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_numeric_bounds() {
        let cases = [
            (AppConfig { max_bytes: 0, ..Default::default() }, "max_bytes"),
            (AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() }, "max_bytes"),
            (AppConfig { timeout_ms: 99, ..Default::default() }, "timeout_ms"),
            (AppConfig { timeout_ms: 300_001, ..Default::default() }, "timeout_ms"),
        ];
        for (config, field) in cases {
            assert_eq!(rejected_field(config).as_deref(), Some(field));
        }

        let lower = AppConfig { max_bytes: 1, timeout_ms: 100, ..Default::default() };
        assert!(lower.validate().is_ok());
        let upper = AppConfig { max_bytes: 50 * 1024 * 1024, timeout_ms: 300_000, ..Default::default() };
        assert!(upper.validate().is_ok());
    }

    #[test]
    fn test_blank_user_agent() {
        let config = AppConfig { user_agent: "  ".into(), ..Default::default() };
        assert_eq!(rejected_field(config).as_deref(), Some("user_agent"));
    }
}
