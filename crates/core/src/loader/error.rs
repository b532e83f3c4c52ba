//! Loader failure types.

use std::error::Error as StdError;

/// Boxed transport error kept as the source of [`FetchError::Network`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Why a fetcher could not produce loader data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The loader endpoint answered with a non-2xx status.
    #[error("Failed to fetch loader data: {status}")]
    Http { status: u16 },

    /// Transport failure before a response arrived.
    #[error("network error")]
    Network(#[source] BoxError),

    /// Request did not complete within the configured timeout.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Response body exceeded the byte limit.
    #[error("response of {size} bytes exceeds {limit}")]
    TooLarge { size: u64, limit: usize },

    /// Payload could not be interpreted as the expected shape.
    #[error("Failed to parse loader data: {0}")]
    Parse(String),

    /// A fetch had to be started outside of a Tokio runtime.
    #[error("no Tokio runtime available to run the loader fetch")]
    NoRuntime,

    /// The fetch task ended without settling.
    #[error("loader fetch was interrupted before it settled")]
    Interrupted,

    /// Any other fetcher-specific failure.
    #[error("{0}")]
    Other(String),
}

/// A failed loader fetch, wrapped once with the path it was loading.
///
/// The wrapped value is what gets cached, so repeated lookups observe the very
/// same error (shared behind an `Arc`).
#[derive(Debug, thiserror::Error)]
#[error("Failed to load loader data for route: {path}")]
pub struct LoaderError {
    path: String,
    #[source]
    cause: FetchError,
}

impl LoaderError {
    pub fn new(path: impl Into<String>, cause: FetchError) -> Self {
        Self { path: path.into(), cause }
    }

    /// Canonical loader path that failed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The original failure.
    pub fn fetch_error(&self) -> &FetchError {
        &self.cause
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self.cause, FetchError::Interrupted)
    }

    /// The message followed by every cause in the chain, `: `-separated.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
