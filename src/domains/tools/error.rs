//! Tool-specific error types.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Boxed error returned by a tool implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during tool registration or invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateName(String),

    /// The descriptor cannot be registered (e.g. empty name).
    #[error("Invalid tool descriptor: {0}")]
    InvalidDescriptor(String),

    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool implementation itself failed.
    #[error("Execution of '{tool}' failed: {source}")]
    ExecutionFailed {
        tool: String,
        #[source]
        source: BoxError,
    },
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Wrap the underlying cause of a failed tool execution.
    pub fn execution_failed(tool: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            source: source.into(),
        }
    }

    /// Convert to a protocol-level error for the rmcp layer.
    pub fn into_mcp_error(self) -> McpError {
        if self.is_client_error() {
            McpError::invalid_params(self.to_string(), None)
        } else {
            McpError::internal_error(self.to_string(), None)
        }
    }

    /// Whether the error is caused by the caller (as opposed to the tool).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidArguments(_))
    }
}
