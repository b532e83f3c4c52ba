//! loader_data tool implementation.
//!
//! Loads a route's data through the shared loader cache. A cached value is
//! returned without network I/O; otherwise the call joins or starts a fetch.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use routeloader_client::LoaderClient;
use routeloader_core::{Error, LoaderData};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::check_route;

/// Input parameters for the loader_data tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoaderDataParams {
    /// App route path, e.g. "/posts/1" or "/search?q=rust".
    pub route: String,

    /// Drop any cached data or error for the route before loading.
    #[serde(default)]
    pub refresh: bool,
}

/// Where the returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Already cached before this call.
    Cache,
    /// Fetched by this call, or by an in-flight fetch it joined.
    Network,
}

/// Output structure for the loader_data tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoaderDataOutput {
    /// The route as requested.
    pub route: String,
    /// Canonical loader path used as the cache key.
    pub loader_path: String,
    pub source: DataSource,
    /// RFC 3339 timestamp of when this call completed.
    pub loaded_at: String,
    /// The loader payload.
    pub data: Value,
}

/// Implementation of the loader_data tool.
pub async fn loader_data_impl(client: &LoaderClient, params: LoaderDataParams) -> Result<CallToolResult, McpError> {
    check_route(&params.route)?;

    if params.refresh && client.invalidate(&params.route) {
        tracing::debug!(route = %params.route, "invalidated before refresh");
    }

    let loader_path = client.loader_path(&params.route);
    let (source, data) = match client.data(&params.route).map_err(Error::from)? {
        LoaderData::Ready(data) => (DataSource::Cache, data),
        LoaderData::Pending(load) => (DataSource::Network, load.await.map_err(Error::from)?),
    };

    let output = LoaderDataOutput {
        route: params.route,
        loader_path,
        source,
        loaded_at: chrono::Utc::now().to_rfc3339(),
        data,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize loader data: {e}")))?;

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

    fn output_of(result: CallToolResult) -> LoaderDataOutput {
        let text = result.content[0].as_text().unwrap().text.clone();
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_cached_route_is_served_from_cache() {
        let client = offline_client();
        client.cache().set_data("/_expo/loaders/posts/1", json!({"title": "Hello"}));

        let params = LoaderDataParams { route: "/posts/1/".into(), refresh: false };
        let output = output_of(loader_data_impl(&client, params).await.unwrap());

        assert_eq!(output.loader_path, "/_expo/loaders/posts/1");
        assert_eq!(output.source, DataSource::Cache);
        assert_eq!(output.data, json!({"title": "Hello"}));
    }

    #[tokio::test]
    async fn test_cached_error_is_reported() {
        let client = offline_client();
        let err = LoaderError::new("/_expo/loaders/x", FetchError::Http { status: 500 });
        client.cache().set_error("/_expo/loaders/x", Arc::new(err));

        let params = LoaderDataParams { route: "/x".into(), refresh: false };
        let err = loader_data_impl(&client, params).await.unwrap_err();

        assert_eq!(err.code.0, -32002);
        assert!(err.message.contains("Failed to fetch loader data: 500"));
    }

    #[tokio::test]
    async fn test_rejects_absolute_url() {
        let client = offline_client();
        let params = LoaderDataParams { route: "https://example.com/x".into(), refresh: false };

        let err = loader_data_impl(&client, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_rejects_route_escaping_loader_prefix() {
        let client = offline_client();
        let params = LoaderDataParams { route: "/../../admin/secrets".into(), refresh: false };

        let err = loader_data_impl(&client, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(client.cache().is_empty());
    }

    #[test]
    fn test_params_refresh_defaults_to_false() {
        let params: LoaderDataParams = serde_json::from_value(json!({"route": "/"})).unwrap();
        assert!(!params.refresh);
    }
}
