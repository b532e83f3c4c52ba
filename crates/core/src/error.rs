//! Unified error types for route loaders.
//!
//! Each variant carries a stable code prefix that the MCP layer maps to a
//! JSON-RPC error code.

use std::sync::Arc;

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::loader::LoaderError;

/// Unified error types for the route loader server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty route).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No cache entry found for the given loader path.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// A loader fetch failed; the message includes the full cause chain.
    #[error("LOADER_FAILED: {0}")]
    LoaderFailed(String),

    /// Invalid origin URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed.
    #[error("CLIENT_ERROR: {0}")]
    Client(String),
}

impl From<Arc<LoaderError>> for Error {
    fn from(err: Arc<LoaderError>) -> Self {
        Error::LoaderFailed(err.report())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::LoaderFailed(msg) => (-32002, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::Client(msg) => (-32004, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
