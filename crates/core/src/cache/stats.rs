//! Loader cache statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing how loader lookups were served.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    joins: AtomicU64,
    replays: AtomicU64,
    resolved: AtomicU64,
    failed: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data was served synchronously from the cache.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A new fetch was started.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A caller joined an in-flight load.
    pub fn record_join(&self) {
        self.joins.fetch_add(1, Ordering::Relaxed);
    }

    /// A cached error was raised again.
    pub fn record_replay(&self) {
        self.replays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resolved(&self) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn joins(&self) -> u64 {
        self.joins.load(Ordering::Relaxed)
    }

    pub fn replays(&self) -> u64 {
        self.replays.load(Ordering::Relaxed)
    }

    pub fn resolved(&self) -> u64 {
        self.resolved.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Fraction of lookups that did not start a fetch (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        let served = self.hits() + self.joins() + self.replays();
        let total = served + self.misses();
        if total == 0 { 0.0 } else { served as f64 / total as f64 }
    }

    pub fn reset(&self) {
        for counter in [&self.hits, &self.misses, &self.joins, &self.replays, &self.resolved, &self.failed] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
