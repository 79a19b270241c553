//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - Registration of tools (descriptor + handler), rejecting duplicates
//! - Argument validation and dispatch by tool name
//! - Tool metadata for listing
//!
//! The registry is populated once at startup and then shared read-only
//! (behind an `Arc`) by every transport.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::definitions;
use super::descriptor::ToolDescriptor;
use super::error::ToolError;
use super::handlers::ToolHandler;

/// A registered tool: its descriptor and implementation.
#[derive(Clone)]
pub struct RegisteredTool {
    pub descriptor: Arc<ToolDescriptor>,
    pub handler: Arc<dyn ToolHandler>,
}

/// Tool registry - manages all available tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every tool shipped with the server.
    pub fn with_default_tools() -> Result<Self, ToolError> {
        let mut registry = Self::new();
        definitions::register_all(&mut registry)?;
        Ok(registry)
    }

    /// Register a tool.
    ///
    /// Fails with [`ToolError::InvalidDescriptor`] when the name is empty and
    /// with [`ToolError::DuplicateName`] when the name is taken; in both
    /// cases the registry is left unchanged.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        handler: impl ToolHandler + 'static,
    ) -> Result<&mut Self, ToolError> {
        if descriptor.name.trim().is_empty() {
            return Err(ToolError::InvalidDescriptor(
                "tool name must not be empty".to_string(),
            ));
        }
        if self.index.contains_key(&descriptor.name) {
            warn!("Rejected duplicate tool registration: {}", descriptor.name);
            return Err(ToolError::DuplicateName(descriptor.name));
        }

        info!("Registered tool: {}", descriptor.name);
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor: Arc::new(descriptor),
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .map(|t| t.descriptor.name.as_str())
            .collect()
    }

    /// Look up a registered tool by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Iterate over registered tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.iter()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both HTTP and STDIO transports use this to get tool metadata.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.descriptor.to_tool()).collect()
    }

    /// Invoke a tool by name.
    ///
    /// Arguments are validated against the tool's descriptor before the
    /// handler runs. Any handler failure is reported as
    /// [`ToolError::ExecutionFailed`] carrying the registered name.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<Value, ToolError> {
        let Some(tool) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        tool.descriptor.validate_arguments(arguments)?;

        let empty = JsonObject::new();
        match tool.handler.call(arguments.unwrap_or(&empty)).await {
            Ok(value) => {
                debug!("Tool {} completed", name);
                Ok(value)
            }
            Err(source) => {
                warn!("Tool {} failed: {}", name, source);
                Err(ToolError::execution_failed(name, source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::descriptor::ValueType;
    use crate::domains::tools::error::BoxError;
    use crate::domains::tools::handlers::FnHandler;
    use futures::future::{Ready, ready};
    use serde_json::json;

    fn echo_descriptor(name: &str, description: &str) -> ToolDescriptor {
        ToolDescriptor::new(name, description, ValueType::String).param(
            "text",
            ValueType::String,
            "Text to echo",
        )
    }

    type Outcome = Ready<Result<Value, BoxError>>;

    fn echo_text(args: JsonObject) -> Outcome {
        ready(Ok(args["text"].clone()))
    }

    fn refuse_connection(_args: JsonObject) -> Outcome {
        ready(Err(std::io::Error::other("connection refused").into()))
    }

    fn echo() -> FnHandler<fn(JsonObject) -> Outcome> {
        FnHandler(echo_text as fn(JsonObject) -> _)
    }

    fn failing() -> FnHandler<fn(JsonObject) -> Outcome> {
        FnHandler(refuse_connection as fn(JsonObject) -> _)
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_tools() {
        let registry = ToolRegistry::with_default_tools().unwrap();
        assert_eq!(registry.tool_names(), vec!["cotacao"]);
    }

    #[test]
    fn test_register_duplicate_keeps_first() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("echo", "first"), echo())
            .unwrap();

        let err = registry
            .register(echo_descriptor("echo", "second"), echo())
            .err()
            .unwrap();
        assert!(matches!(err, ToolError::DuplicateName(name) if name == "echo"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().descriptor.description, "first");
    }

    #[test]
    fn test_register_empty_name() {
        let mut registry = ToolRegistry::new();
        let err = registry
            .register(echo_descriptor("  ", "blank"), echo())
            .err()
            .unwrap();
        assert!(matches!(err, ToolError::InvalidDescriptor(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_tool_names_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("zeta", "z"), echo())
            .unwrap()
            .register(echo_descriptor("alpha", "a"), echo())
            .unwrap();

        assert_eq!(registry.tool_names(), vec!["zeta", "alpha"]);
        let tools = registry.tools();
        assert_eq!(tools[0].name, "zeta");
        assert_eq!(tools[1].name, "alpha");
    }

    #[tokio::test]
    async fn test_invoke_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("echo", "echo"), echo())
            .unwrap();

        let value = registry
            .invoke("echo", Some(&args(json!({ "text": "oi" }))))
            .await
            .unwrap();
        assert_eq!(value, json!("oi"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_leaves_registry_unchanged() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("echo", "echo"), echo())
            .unwrap();

        let err = registry.invoke("missing", None).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
        assert_eq!(registry.tool_names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn test_invoke_invalid_arguments() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("echo", "echo"), echo())
            .unwrap();

        let err = registry
            .invoke("echo", Some(&args(json!({ "text": 1 }))))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = registry.invoke("echo", None).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_invoke_execution_failure_wraps_cause() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("broken", "fails"), failing())
            .unwrap();

        let err = registry
            .invoke("broken", Some(&args(json!({ "text": "x" }))))
            .await
            .unwrap_err();
        assert!(!err.is_client_error());
        match err {
            ToolError::ExecutionFailed { tool, source } => {
                assert_eq!(tool, "broken");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("Expected ExecutionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_reports_failure_under_registered_name() {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_descriptor("primary", "fails"), failing())
            .unwrap()
            .register(echo_descriptor("fallback", "fails"), failing())
            .unwrap();

        for name in ["primary", "fallback"] {
            let err = registry
                .invoke(name, Some(&args(json!({ "text": "x" }))))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::ExecutionFailed { tool, .. } if tool == name));
        }
    }

    #[tokio::test]
    async fn test_invoke_blank_ticker_is_invalid_arguments() {
        let registry = ToolRegistry::with_default_tools().unwrap();
        for ticker in ["", "   "] {
            let err = registry
                .invoke("cotacao", Some(&args(json!({ "ticker": ticker }))))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }
    }
}
