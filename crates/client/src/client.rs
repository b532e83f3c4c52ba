//! Route-level façade over the loader cache.
//!
//! Callers hand in raw route paths (`/posts/1/?tab=a`); the client normalizes
//! them into loader paths and runs the deduplicating accessor against its
//! cache and HTTP fetcher.

use std::sync::Arc;

use routeloader_core::loader::LoadOutcome;
use routeloader_core::{
    AppConfig, Error, LoaderCache, LoaderData, LoaderError, get_loader_data, load_loader_data, loader_module_path,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::fetch::{FetchConfig, HttpFetcher};

/// Loads route data through a shared [`LoaderCache`].
pub struct LoaderClient<T = Value> {
    cache: LoaderCache<T>,
    fetcher: Arc<HttpFetcher<T>>,
}

impl<T> Clone for LoaderClient<T> {
    fn clone(&self) -> Self {
        Self { cache: self.cache.clone(), fetcher: Arc::clone(&self.fetcher) }
    }
}

impl<T> std::fmt::Debug for LoaderClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderClient").field("cache", &self.cache).field("fetcher", &self.fetcher).finish()
    }
}

impl<T> LoaderClient<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a client with its own cache from application config.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = HttpFetcher::new(&config.origin, FetchConfig::from(config))?;
        Ok(Self::from_parts(LoaderCache::new(), fetcher))
    }

    /// Assemble a client from an existing cache and fetcher.
    pub fn from_parts(cache: LoaderCache<T>, fetcher: HttpFetcher<T>) -> Self {
        Self { cache, fetcher: Arc::new(fetcher) }
    }

    /// Swap in a different cache, e.g. one shared with other clients.
    pub fn with_cache(self, cache: LoaderCache<T>) -> Self {
        Self { cache, ..self }
    }

    /// Canonical loader path for a route.
    pub fn loader_path(&self, route_path: &str) -> String {
        loader_module_path(route_path)
    }

    /// Look up loader data for a route without waiting.
    ///
    /// A miss outside of a Tokio runtime fails with `FetchError::NoRuntime`.
    pub fn data(&self, route_path: &str) -> Result<LoaderData<T>, Arc<LoaderError>> {
        get_loader_data(&loader_module_path(route_path), &self.cache, self.fetcher.as_ref())
    }

    /// Load data for a route, waiting for an in-flight or new fetch.
    pub async fn load(&self, route_path: &str) -> LoadOutcome<T> {
        load_loader_data(&loader_module_path(route_path), &self.cache, self.fetcher.as_ref()).await
    }

    /// Drop cached data and errors for a route so the next lookup refetches.
    pub fn invalidate(&self, route_path: &str) -> bool {
        self.cache.invalidate(&loader_module_path(route_path))
    }

    pub fn cache(&self) -> &LoaderCache<T> {
        &self.cache
    }

    pub fn fetcher(&self) -> &HttpFetcher<T> {
        &self.fetcher
    }
}
