//! In-memory cache for route loader results.
//!
//! Each canonical loader path owns three independent namespaces:
//!
//! - **data**: successfully resolved payloads
//! - **errors**: terminal failures, re-raised verbatim until cleared
//! - **pending**: in-flight loads, used purely for request deduplication
//!
//! The namespaces are structurally independent, and `set_data` does not touch
//! the other two. The loader accessor coordinates transitions so that at most
//! one of them is live for a key. All three live behind a single mutex, so a
//! lookup across namespaces never observes a half-applied transition.

pub mod stats;

pub use stats::CacheStats;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::loader::{LoaderError, PendingLoad};

static GLOBAL: Lazy<LoaderCache> = Lazy::new(LoaderCache::new);

/// Observable state of a single cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    Empty,
    Pending,
    Ready,
    Failed,
}

pub(crate) struct Namespaces<T> {
    pub(crate) data: HashMap<String, T>,
    pub(crate) errors: HashMap<String, Arc<LoaderError>>,
    pub(crate) pending: HashMap<String, PendingLoad<T>>,
}

impl<T> Namespaces<T> {
    fn distinct_keys(&self) -> BTreeSet<&String> {
        self.data.keys().chain(self.errors.keys()).chain(self.pending.keys()).collect()
    }
}

impl<T> Default for Namespaces<T> {
    fn default() -> Self {
        Self { data: HashMap::new(), errors: HashMap::new(), pending: HashMap::new() }
    }
}

/// Keyed store of loader data, errors and in-flight loads.
///
/// Cloning is cheap and clones share storage, so a cache can be handed to
/// spawned tasks. Use [`LoaderCache::global`] for the process-wide default, or
/// [`LoaderCache::new`] for an isolated instance.
pub struct LoaderCache<T = Value> {
    entries: Arc<Mutex<Namespaces<T>>>,
    stats: Arc<CacheStats>,
}

impl<T> Clone for LoaderCache<T> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries), stats: Arc::clone(&self.stats) }
    }
}

impl<T> Default for LoaderCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LoaderCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("LoaderCache")
            .field("data", &entries.data.len())
            .field("errors", &entries.errors.len())
            .field("pending", &entries.pending.len())
            .finish()
    }
}

impl LoaderCache<Value> {
    /// The process-wide default cache.
    pub fn global() -> &'static LoaderCache<Value> {
        &GLOBAL
    }
}

impl<T> LoaderCache<T> {
    /// Create an empty, isolated cache.
    pub fn new() -> Self {
        Self { entries: Arc::new(Mutex::new(Namespaces::default())), stats: Arc::new(CacheStats::new()) }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Namespaces<T>> {
        self.entries.lock()
    }

    /// Lookup statistics shared by all clones of this cache.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Whether both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub fn has_data(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    pub fn delete_data(&self, key: &str) -> bool {
        self.lock().data.remove(key).is_some()
    }

    pub fn get_error(&self, key: &str) -> Option<Arc<LoaderError>> {
        self.lock().errors.get(key).cloned()
    }

    pub fn has_error(&self, key: &str) -> bool {
        self.lock().errors.contains_key(key)
    }

    pub fn set_error(&self, key: impl Into<String>, err: Arc<LoaderError>) {
        self.lock().errors.insert(key.into(), err);
    }

    pub fn delete_error(&self, key: &str) -> bool {
        self.lock().errors.remove(key).is_some()
    }

    pub fn get_pending(&self, key: &str) -> Option<PendingLoad<T>> {
        self.lock().pending.get(key).cloned()
    }

    pub fn has_pending(&self, key: &str) -> bool {
        self.lock().pending.contains_key(key)
    }

    pub fn set_pending(&self, key: impl Into<String>, load: PendingLoad<T>) {
        self.lock().pending.insert(key.into(), load);
    }

    /// Forget the in-flight load for `key`.
    ///
    /// The fetch keeps running and still resolves its waiters, but its result
    /// is no longer written back to the cache.
    pub fn delete_pending(&self, key: &str) -> bool {
        self.lock().pending.remove(key).is_some()
    }

    /// Drop cached data and any cached error for `key`, leaving an in-flight load alone.
    ///
    /// Returns `true` if anything was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut entries = self.lock();
        let had_data = entries.data.remove(key).is_some();
        let had_error = entries.errors.remove(key).is_some();
        had_data || had_error
    }

    /// Empty all three namespaces, returning how many distinct keys were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.distinct_keys().len();
        entries.data.clear();
        entries.errors.clear();
        entries.pending.clear();
        tracing::debug!(removed, "loader cache cleared");
        removed
    }

    /// State of `key`, in the order the loader accessor consults it.
    pub fn state(&self, key: &str) -> EntryState {
        let entries = self.lock();
        if entries.errors.contains_key(key) {
            EntryState::Failed
        } else if entries.data.contains_key(key) {
            EntryState::Ready
        } else if entries.pending.contains_key(key) {
            EntryState::Pending
        } else {
            EntryState::Empty
        }
    }

    /// All keys with an entry in any namespace, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().distinct_keys().into_iter().cloned().collect()
    }

    /// Number of distinct keys with an entry in any namespace.
    pub fn len(&self) -> usize {
        self.lock().distinct_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        let entries = self.lock();
        entries.data.is_empty() && entries.errors.is_empty() && entries.pending.is_empty()
    }
}

impl<T: Clone> LoaderCache<T> {
    pub fn get_data(&self, key: &str) -> Option<T> {
        self.lock().data.get(key).cloned()
    }

    /// Store a resolved payload. Errors and pending loads for `key` are left as they are.
    pub fn set_data(&self, key: impl Into<String>, value: T) {
        self.lock().data.insert(key.into(), value);
    }
}
