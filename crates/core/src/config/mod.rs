//! Configuration for reaching the loader origin.
//!
//! Values are layered with figment, highest precedence first:
//!
//! 1. `ROUTE_LOADER_*` environment variables (`ROUTE_LOADER_TIMEOUT_MS=500`)
//! 2. The TOML file named by `ROUTE_LOADER_CONFIG_FILE`, when set
//! 3. [`AppConfig::default`]
//!
//! The merged result is validated before it is handed out.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

const ENV_PREFIX: &str = "ROUTE_LOADER_";
const CONFIG_FILE_VAR: &str = "ROUTE_LOADER_CONFIG_FILE";

/// Settings for the HTTP loader fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin serving `/_expo/loaders/...`, e.g. a local dev server.
    pub origin: String,

    /// User-Agent header sent with loader requests.
    pub user_agent: String,

    /// Largest loader response body accepted, in bytes.
    pub max_bytes: usize,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8081".into(),
            user_agent: "route-loader/0.1".into(),
            max_bytes: 5 * 1024 * 1024,
            timeout_ms: 20_000,
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadFailed` when a source cannot be read or parsed,
    /// `ConfigError::Invalid` when a merged value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(path) = std::env::var(CONFIG_FILE_VAR) {
            tracing::debug!(%path, "reading loader config file");
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
