//! HTTP loader fetcher.
//!
//! ### Request
//! - `GET <origin><loader path>` with `Accept: application/json`
//! - Loader paths come from `routeloader_core::loader_module_path` and keep
//!   their query string
//!
//! ### Failure mapping
//! - Non-2xx status: `FetchError::Http`
//! - Body over `max_bytes` (declared or actual): `FetchError::TooLarge`
//! - Timeout: `FetchError::Timeout`, other transport errors: `FetchError::Network`
//! - Body not deserializable into `T`: `FetchError::Parse`

pub mod url;

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, header};
use routeloader_core::{AppConfig, Error, FetchError, LoaderFetcher};
use serde::de::DeserializeOwned;

pub use self::url::{UrlError, canonicalize_origin, loader_url};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "route-loader/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "route-loader/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
        }
    }
}

impl FetchConfig {
    /// Timeout in whole milliseconds, saturating at `u64::MAX`.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), max_bytes: config.max_bytes, timeout: config.timeout() }
    }
}

/// Fetches loader data over HTTP and deserializes it into `T`.
pub struct HttpFetcher<T> {
    http: Client,
    origin: ::url::Url,
    config: FetchConfig,
    _data: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpFetcher<T> {
    fn clone(&self) -> Self {
        Self { http: self.http.clone(), origin: self.origin.clone(), config: self.config.clone(), _data: PhantomData }
    }
}

impl<T> std::fmt::Debug for HttpFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").field("origin", &self.origin.as_str()).field("config", &self.config).finish()
    }
}

impl<T> HttpFetcher<T> {
    /// Create a fetcher for loaders served by `origin`.
    pub fn new(origin: &str, config: FetchConfig) -> Result<Self, Error> {
        let origin = canonicalize_origin(origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, origin, config, _data: PhantomData })
    }

    /// Origin that loader paths are resolved against.
    pub fn origin(&self) -> &::url::Url {
        &self.origin
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl<T> LoaderFetcher<T> for HttpFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn fetch(&self, path: &str) -> BoxFuture<'static, Result<T, FetchError>> {
        let http = self.http.clone();
        let url = loader_url(&self.origin, path);
        let max_bytes = self.config.max_bytes;
        let timeout_ms = self.config.timeout_ms();

        async move {
            let start = Instant::now();
            let url = url.map_err(|e| FetchError::Other(e.to_string()))?;

            let response = http
                .get(url.clone())
                .header(header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| transport_error(e, timeout_ms))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Http { status: status.as_u16() });
            }

            if let Some(len) = response.content_length()
                && exceeds_limit(len, max_bytes)
            {
                return Err(FetchError::TooLarge { size: len, limit: max_bytes });
            }

            let bytes = response.bytes().await.map_err(|e| transport_error(e, timeout_ms))?;

            if bytes.len() > max_bytes {
                let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
                return Err(FetchError::TooLarge { size, limit: max_bytes });
            }

            let data = serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

            tracing::debug!("fetched loader {} in {}ms ({} bytes)", url, start.elapsed().as_millis(), bytes.len());

            Ok(data)
        }
        .boxed()
    }
}

fn transport_error(err: reqwest::Error, timeout_ms: u64) -> FetchError {
    if err.is_timeout() { FetchError::Timeout(timeout_ms) } else { FetchError::Network(Box::new(err)) }
}

/// Whether a declared body length is over the limit, without truncating on 32-bit targets.
fn exceeds_limit(len: u64, max_bytes: usize) -> bool {
    usize::try_from(len).map_or(true, |len| len > max_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "route-loader/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "ua/1".into(), max_bytes: 10, timeout_ms: 250, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "ua/1");
        assert_eq!(config.max_bytes, 10);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_timeout_ms_saturates() {
        let config = FetchConfig { timeout: Duration::from_millis(250), ..Default::default() };
        assert_eq!(config.timeout_ms(), 250);

        let config = FetchConfig { timeout: Duration::MAX, ..Default::default() };
        assert_eq!(config.timeout_ms(), u64::MAX);
    }

    #[test]
    fn test_exceeds_limit() {
        assert!(!exceeds_limit(16, 16));
        assert!(exceeds_limit(17, 16));
        assert!(exceeds_limit(u64::MAX, usize::MAX - 1));
    }

    #[tokio::test]
    async fn test_http_fetcher_new() {
        let fetcher = HttpFetcher::<Value>::new("localhost:8081", FetchConfig::default()).unwrap();
        assert_eq!(fetcher.origin().as_str(), "http://localhost:8081/");
    }

    #[test]
    fn test_http_fetcher_rejects_bad_origin() {
        let result = HttpFetcher::<Value>::new("ftp://example.com", FetchConfig::default());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
