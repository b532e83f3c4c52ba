//! Deduplicating loader data accessor.
//!
//! [`get_loader_data`] is the single point that decides, for one canonical
//! loader path, whether to:
//!
//! 1. re-raise a cached terminal error (the identical `Arc`, no new fetch)
//! 2. return cached data synchronously
//! 3. hand out the load already in flight
//! 4. start exactly one new fetch
//!
//! Step 4 registers the pending load under the cache mutex before the fetcher
//! is invoked, so concurrent callers on any thread either see the pending load
//! or the settled result, never an empty slot.
//!
//! Fetches run as spawned tasks. A caller that drops its [`PendingLoad`] does
//! not cancel the fetch; the result is still cached for later callers.

mod error;
mod fetcher;
mod pending;

pub use error::{BoxError, FetchError, LoaderError};
pub use fetcher::{FnFetcher, LoaderFetcher, fetcher_fn};
pub use pending::{LoadOutcome, PendingLoad};

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::cache::LoaderCache;

/// Result of a loader lookup that did not fail synchronously.
#[derive(Debug)]
pub enum LoaderData<T> {
    /// Data was already cached.
    Ready(T),
    /// A fetch is in flight; await it for the outcome.
    Pending(PendingLoad<T>),
}

impl<T: Clone> LoaderData<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoaderData::Ready(_))
    }

    /// The cached value, if it was available synchronously.
    pub fn ready(self) -> Option<T> {
        match self {
            LoaderData::Ready(value) => Some(value),
            LoaderData::Pending(_) => None,
        }
    }

    /// The in-flight load, if one was returned.
    pub fn pending(&self) -> Option<&PendingLoad<T>> {
        match self {
            LoaderData::Ready(_) => None,
            LoaderData::Pending(load) => Some(load),
        }
    }

    /// Wait for the value, whichever way it was returned.
    pub async fn resolve(self) -> LoadOutcome<T> {
        match self {
            LoaderData::Ready(value) => Ok(value),
            LoaderData::Pending(load) => load.await,
        }
    }
}

/// Look up loader data for `resolved_path`, fetching it at most once.
///
/// `Err` is the synchronous failure path: it carries the cached error from an
/// earlier failed fetch. A miss spawns the fetch on the current Tokio runtime.
///
/// # Errors
///
/// Besides a cached error, a miss outside of a Tokio runtime fails with
/// [`FetchError::NoRuntime`]. That error is not cached and no fetch is started.
pub fn get_loader_data<T, F>(
    resolved_path: &str, cache: &LoaderCache<T>, fetcher: &F,
) -> Result<LoaderData<T>, Arc<LoaderError>>
where
    T: Clone + Send + Sync + 'static,
    F: LoaderFetcher<T> + ?Sized,
{
    let (runtime, sender, load) = {
        let mut entries = cache.lock();

        if let Some(err) = entries.errors.get(resolved_path) {
            cache.stats().record_replay();
            tracing::debug!(path = resolved_path, "replaying cached loader error");
            return Err(Arc::clone(err));
        }

        if let Some(data) = entries.data.get(resolved_path) {
            cache.stats().record_hit();
            tracing::debug!(path = resolved_path, "loader cache hit");
            return Ok(LoaderData::Ready(data.clone()));
        }

        if let Some(load) = entries.pending.get(resolved_path) {
            cache.stats().record_join();
            tracing::debug!(path = resolved_path, load = load.id(), "joining in-flight loader fetch");
            return Ok(LoaderData::Pending(load.clone()));
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(path = resolved_path, "no Tokio runtime to start a loader fetch");
            return Err(Arc::new(LoaderError::new(resolved_path, FetchError::NoRuntime)));
        };

        let (sender, receiver) = oneshot::channel();
        let load = PendingLoad::new(resolved_path.to_string(), receiver);
        entries.pending.insert(resolved_path.to_string(), load.clone());
        (runtime, sender, load)
    };

    cache.stats().record_miss();
    tracing::debug!(path = resolved_path, load = load.id(), "loader cache miss, fetching");

    // Armed before the fetcher runs, so a panicking fetcher cannot strand the pending entry.
    let settle = Settle { cache: cache.clone(), key: resolved_path.to_string(), load_id: load.id(), armed: true };
    let fetch = fetcher.fetch(resolved_path);

    runtime.spawn(async move {
        let outcome = fetch.await;
        let result = settle.finish(outcome);
        sender.send(result).ok();
    });

    Ok(LoaderData::Pending(load))
}

/// Async convenience over [`get_loader_data`] that waits for pending loads.
pub async fn load_loader_data<T, F>(resolved_path: &str, cache: &LoaderCache<T>, fetcher: &F) -> LoadOutcome<T>
where
    T: Clone + Send + Sync + 'static,
    F: LoaderFetcher<T> + ?Sized,
{
    get_loader_data(resolved_path, cache, fetcher)?.resolve().await
}

/// Writes a finished fetch back into the cache.
///
/// If dropped while still armed (the task was cancelled or the fetch
/// panicked), it removes its own pending entry so the key can be retried.
struct Settle<T> {
    cache: LoaderCache<T>,
    key: String,
    load_id: u64,
    armed: bool,
}

impl<T: Clone> Settle<T> {
    fn finish(mut self, outcome: Result<T, FetchError>) -> LoadOutcome<T> {
        self.armed = false;

        let result = outcome.map_err(|cause| Arc::new(LoaderError::new(self.key.as_str(), cause)));

        let mut entries = self.cache.lock();
        let current = entries.pending.get(&self.key).is_some_and(|load| load.id() == self.load_id);
        if !current {
            tracing::debug!(path = %self.key, load = self.load_id, "loader fetch settled after its entry was removed");
            return result;
        }

        match &result {
            Ok(data) => {
                entries.data.insert(self.key.clone(), data.clone());
                entries.errors.remove(&self.key);
                entries.pending.remove(&self.key);
                self.cache.stats().record_resolved();
                tracing::debug!(path = %self.key, load = self.load_id, "loader fetch resolved");
            }
            Err(err) => {
                entries.errors.insert(self.key.clone(), Arc::clone(err));
                entries.pending.remove(&self.key);
                self.cache.stats().record_failed();
                tracing::debug!(
                    path = %self.key,
                    load = self.load_id,
                    error = %err.fetch_error(),
                    "loader fetch failed"
                );
            }
        }

        result
    }
}

impl<T> Drop for Settle<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut entries = self.cache.lock();
        if entries.pending.get(&self.key).is_some_and(|load| load.id() == self.load_id) {
            entries.pending.remove(&self.key);
        }
        tracing::warn!(path = %self.key, load = self.load_id, "loader fetch interrupted before settling");
    }
}
