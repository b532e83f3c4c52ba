//! Client code for route loaders.
//!
//! This crate provides the HTTP loader fetcher and the `LoaderClient` façade
//! that joins path normalization, the loader cache and the fetcher, shared by
//! the server and library callers.

pub mod client;
pub mod fetch;

pub use client::LoaderClient;
pub use fetch::{FetchConfig, HttpFetcher, UrlError, canonicalize_origin};
