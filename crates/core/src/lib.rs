//! Core types and shared functionality for route loaders.
//!
//! This crate provides:
//! - Route path normalization into loader-module paths
//! - An in-memory loader cache with data, error and in-flight namespaces
//! - The deduplicating loader data accessor
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod path;

pub use cache::{CacheStats, EntryState, LoaderCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use loader::{
    FetchError, LoaderData, LoaderError, LoaderFetcher, PendingLoad, fetcher_fn, get_loader_data, load_loader_data,
};
pub use path::{has_dot_segments, loader_module_path};
