//! loader_cache_invalidate tool implementation.
//!
//! Invalidates a single route or clears the whole loader cache.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use routeloader_client::LoaderClient;
use routeloader_core::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::check_route;

/// Parameters for the loader_cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    /// Route to invalidate. If omitted, every entry is cleared, including
    /// in-flight loads.
    #[serde(default)]
    pub route: Option<String>,
}

/// Output from the loader_cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Number of cache keys removed.
    pub removed: usize,
    /// Loader path that was targeted, if a route was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader_path: Option<String>,
}

/// Implementation of the loader_cache_invalidate tool.
pub async fn invalidate_impl(
    client: &LoaderClient, params: CacheInvalidateParams,
) -> Result<CallToolResult, McpError> {
    let output = match params.route {
        Some(route) => {
            check_route(&route)?;
            let removed = usize::from(client.invalidate(&route));
            CacheInvalidateOutput { removed, loader_path: Some(client.loader_path(&route)) }
        }
        None => CacheInvalidateOutput { removed: client.cache().clear(), loader_path: None },
    };

    tracing::info!(removed = output.removed, "loader cache invalidated");

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize invalidate result: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeloader_core::{AppConfig, FetchError, LoaderError};
    use serde_json::json;
    use std::sync::Arc;

    fn offline_client() -> LoaderClient {
        let config = AppConfig { origin: "http://127.0.0.1:9".into(), ..Default::default() };
        LoaderClient::new(&config).unwrap()
    }

    fn output_of(result: CallToolResult) -> CacheInvalidateOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_invalidate_single_route() {
        let client = offline_client();
        client.cache().set_data("/_expo/loaders/a", json!(1));
        client.cache().set_data("/_expo/loaders/b", json!(2));

        let params = CacheInvalidateParams { route: Some("/a/".into()) };
        let output = output_of(invalidate_impl(&client, params).await.unwrap());

        assert_eq!(output.removed, 1);
        assert_eq!(output.loader_path.as_deref(), Some("/_expo/loaders/a"));
        assert!(client.cache().has_data("/_expo/loaders/b"));
    }

    #[tokio::test]
    async fn test_invalidate_unknown_route() {
        let client = offline_client();
        let params = CacheInvalidateParams { route: Some("/missing".into()) };

        let output = output_of(invalidate_impl(&client, params).await.unwrap());
        assert_eq!(output.removed, 0);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let client = offline_client();
        client.cache().set_data("/_expo/loaders/a", json!(1));
        client.cache().set_data("/_expo/loaders/b", json!(2));

        let output = output_of(invalidate_impl(&client, CacheInvalidateParams { route: None }).await.unwrap());
        assert_eq!(output.removed, 2);
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_all_counts_keys_across_namespaces() {
        let client = offline_client();
        let err = LoaderError::new("/_expo/loaders/a", FetchError::Http { status: 500 });
        client.cache().set_data("/_expo/loaders/a", json!(1));
        client.cache().set_error("/_expo/loaders/a", Arc::new(err));

        let output = output_of(invalidate_impl(&client, CacheInvalidateParams { route: None }).await.unwrap());
        assert_eq!(output.removed, 1);
    }
}
