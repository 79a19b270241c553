//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler. It owns the tool registry
//! and the optional token verifier, both built once from [`Config`] and
//! shared read-only by every transport.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered into a [`ToolRegistry`]. The rmcp ToolRouter used by the
//! STDIO transport is derived from that registry, and the HTTP transport
//! dispatches into the same registry, so both see identical tools.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo, Tool},
    tool_handler,
};
use tracing::{info, warn};

use super::auth::StaticTokenVerifier;
use super::config::Config;
use super::error;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router, into_call_result};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and exposes
/// transport-independent helpers used by the HTTP transport.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools.
    registry: Arc<ToolRegistry>,

    /// Bearer-token gate, present when tokens are configured.
    verifier: Option<Arc<StaticTokenVerifier>>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the default tools.
    pub fn new(config: Config) -> error::Result<Self> {
        let registry = ToolRegistry::with_default_tools()?;
        Self::with_registry(config, registry)
    }

    /// Create a new MCP server exposing the given registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> error::Result<Self> {
        let verifier = config.auth.verifier()?.map(Arc::new);
        let registry = Arc::new(registry);

        match &verifier {
            Some(v) => info!("Bearer authentication enabled ({} token(s))", v.len()),
            None => warn!(
                "No auth tokens configured - tools are callable without authentication. \
                 Set MCP_AUTH_TOKENS or MCP_AUTH_TOKENS_FILE to require a bearer token."
            ),
        }
        info!("Server configured with {} tool(s)", registry.len());

        Ok(Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
            verifier,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the instructions sent to clients on initialize.
    pub fn instructions(&self) -> &str {
        &self.config.server.instructions
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Get the token verifier, if authentication is enabled.
    pub fn verifier(&self) -> Option<&StaticTokenVerifier> {
        self.verifier.as_deref()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.tools()
    }

    /// Call a tool by name.
    ///
    /// Execution failures come back as an error result (`isError: true`);
    /// unknown tools and bad arguments come back as `Err`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        into_call_result(self.registry.invoke(name, arguments).await)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::Identity;
    use serde_json::json;

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_server_without_auth() {
        let server = McpServer::new(Config::default()).unwrap();
        assert!(server.verifier().is_none());
        assert_eq!(server.name(), "cotacao-mcp-server");
        let tools = server.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "cotacao");
    }

    #[test]
    fn test_server_with_auth() {
        let mut config = Config::default();
        config
            .auth
            .insert("tk-abcdef123456", Identity::with_client_id("lorem_ipsum"))
            .unwrap();
        let server = McpServer::new(config).unwrap();
        let verifier = server.verifier().unwrap();
        assert!(verifier.verify("tk-abcdef123456").is_ok());
    }

    #[test]
    fn test_get_info_enables_tools() {
        let server = McpServer::new(Config::default()).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("cotacao"));
    }

    #[test]
    fn test_tool_handler_routes_registry_tools() {
        let server = McpServer::new(Config::default()).unwrap();
        let routed = server.tool_router.list_all();
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].name, "cotacao");
        assert!(server.tool_router.has_route("cotacao"));
    }

    #[tokio::test]
    async fn test_call_tool() {
        let server = McpServer::new(Config::default()).unwrap();
        let result = server
            .call_tool("cotacao", Some(&args(json!({ "ticker": "PETR4" }))))
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.structured_content, Some(json!({ "result": 250.0 })));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = McpServer::new(Config::default()).unwrap();
        let err = server.call_tool("unknown", None).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert_eq!(server.registry().tool_names(), vec!["cotacao"]);
    }
}
