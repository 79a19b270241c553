//! Tool handlers module.
//!
//! A tool implementation is a [`ToolHandler`]: it receives arguments that the
//! registry has already validated against the tool's descriptor, and returns
//! a JSON value or the underlying cause of failure. The registry wraps every
//! such cause in [`ToolError::ExecutionFailed`].

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::{Value, json};

use super::descriptor::RESULT_KEY;
use super::error::{BoxError, ToolError};

/// Trait for implementing tool handlers.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given (validated) arguments.
    async fn call(&self, arguments: &JsonObject) -> Result<Value, BoxError>;
}

/// Adapter turning an async closure into a [`ToolHandler`].
pub struct FnHandler<F>(pub F);

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(JsonObject) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Value, BoxError>> + Send,
{
    async fn call(&self, arguments: &JsonObject) -> Result<Value, BoxError> {
        (self.0)(arguments.clone()).await
    }
}

/// Build the successful MCP result for a tool return value.
///
/// The value is rendered as text content and repeated as structured content
/// under [`RESULT_KEY`].
pub fn success_result(value: Value) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(value.to_string())]);
    result.structured_content = Some(json!({ RESULT_KEY: value }));
    result
}

/// Map an invocation outcome to an MCP result.
///
/// Execution failures are reported inside the result with `isError: true`
/// so the caller can see them; all other errors are returned to the
/// protocol layer.
pub fn into_call_result(outcome: Result<Value, ToolError>) -> Result<CallToolResult, ToolError> {
    match outcome {
        Ok(value) => Ok(success_result(value)),
        Err(e @ ToolError::ExecutionFailed { .. }) => {
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_success_result() {
        let result = success_result(json!(250.0));
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "250.0");
        assert_eq!(result.structured_content, Some(json!({ "result": 250.0 })));
    }

    #[test]
    fn test_execution_failure_becomes_error_result() {
        let outcome = Err(ToolError::execution_failed("cotacao", "boom"));
        let result = into_call_result(outcome).unwrap();
        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("boom"));
    }

    #[test]
    fn test_client_error_is_propagated() {
        let outcome = Err(ToolError::not_found("nope"));
        assert!(matches!(
            into_call_result(outcome),
            Err(ToolError::NotFound(name)) if name == "nope"
        ));
    }

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = FnHandler(|args: JsonObject| async move {
            Ok::<_, BoxError>(json!(args.len()))
        });
        let value = handler.call(&JsonObject::new()).await.unwrap();
        assert_eq!(value, json!(0));
    }
}
