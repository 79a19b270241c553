//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! This module builds the ToolRouter for STDIO transport. Every registered
//! tool gets a dynamic route that dispatches back into the shared registry,
//! so argument validation and error mapping are identical across transports.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};

use super::descriptor::ToolDescriptor;
use super::handlers::into_call_result;
use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .iter()
        .fold(ToolRouter::new(), |router, tool| {
            router.with_route(create_route(registry.clone(), tool.descriptor.clone()))
        })
}

/// Create a ToolRoute for one registered tool.
fn create_route<S>(registry: Arc<ToolRegistry>, descriptor: Arc<ToolDescriptor>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name.clone();

    ToolRoute::new_dyn(descriptor.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone();
        let registry = registry.clone();
        let name = name.clone();
        async move {
            let outcome = registry.invoke(&name, args.as_ref()).await;
            into_call_result(outcome).map_err(|e| e.into_mcp_error())
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let registry = Arc::new(ToolRegistry::with_default_tools().unwrap());
        let router: ToolRouter<TestServer> = build_tool_router(registry);
        let tools = router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "cotacao");
        assert!(tools[0].input_schema.contains_key("properties"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let registry = Arc::new(ToolRegistry::with_default_tools().unwrap());
        let registry_names: Vec<String> =
            registry.tool_names().into_iter().map(String::from).collect();

        let router: ToolRouter<TestServer> = build_tool_router(registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in &registry_names {
            assert!(router_names.contains(&name.as_str()));
        }
    }
}
