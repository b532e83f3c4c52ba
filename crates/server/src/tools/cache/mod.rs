//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and invalidating the loader cache.

pub mod get;
pub mod invalidate;

pub use get::{CacheGetParams, get_impl};
pub use invalidate::{CacheInvalidateParams, invalidate_impl};
