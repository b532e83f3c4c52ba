//! loader_cache_get tool implementation.
//!
//! Reports the cache entry for a route without fetching.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use routeloader_client::LoaderClient;
use routeloader_core::{EntryState, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::check_route;

/// Parameters for the loader_cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// App route path whose cache entry to inspect.
    pub route: String,
}

/// Output from the loader_cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub route: String,
    pub loader_path: String,
    pub state: EntryState,
    /// Cached payload, when the state is "ready".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Cached failure with its cause chain, when the state is "failed".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Implementation of the loader_cache_get tool.
pub async fn get_impl(client: &LoaderClient, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    check_route(&params.route)?;

    let loader_path = client.loader_path(&params.route);
    let cache = client.cache();

    let state = cache.state(&loader_path);
    let (data, error) = match state {
        EntryState::Empty => return Err(Error::CacheMiss(loader_path).into()),
        EntryState::Pending => (None, None),
        EntryState::Ready => (cache.get_data(&loader_path), None),
        EntryState::Failed => (None, cache.get_error(&loader_path).map(|e| e.report())),
    };

    let output = CacheGetOutput { route: params.route, loader_path, state, data, error };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize cache entry: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
