//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{CacheGetParams, CacheInvalidateParams, get_impl, invalidate_impl};
use crate::tools::loader_data::{LoaderDataParams, loader_data_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use routeloader_client::LoaderClient;

/// The main MCP server handler for mcp-loaders.
#[derive(Clone)]
pub struct McpLoaderServer {
    tool_router: ToolRouter<Self>,
    client: LoaderClient,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpLoaderServer {
    /// Create a new server handler around a loader client.
    pub fn new(client: LoaderClient) -> Self {
        Self { tool_router: Self::tool_router(), client }
    }

    /// Load route data through the shared loader cache.
    ///
    /// Concurrent calls for the same route share one request. Failures are cached
    /// until invalidated.
    #[tool(
        description = "Load data for an app route via its /_expo/loaders endpoint. Cached results are reused; set refresh=true to refetch."
    )]
    async fn loader_data(&self, params: Parameters<LoaderDataParams>) -> Result<CallToolResult, McpError> {
        loader_data_impl(&self.client, params.0).await
    }

    /// Inspect the cache entry for a route without fetching.
    #[tool(description = "Inspect the loader cache entry for a route: state plus cached data or error. No network I/O.")]
    async fn loader_cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.client, params.0).await
    }

    /// Invalidate one route, or clear the whole cache.
    #[tool(description = "Invalidate cached loader data and errors for a route, or clear the entire cache if no route is given.")]
    async fn loader_cache_invalidate(
        &self, params: Parameters<CacheInvalidateParams>,
    ) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.client, params.0).await
    }
}

impl ServerHandler for McpLoaderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-loaders".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
