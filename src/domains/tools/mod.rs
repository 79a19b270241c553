//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named functions that MCP clients discover and call remotely.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `descriptor.rs` - Declared tool signatures and argument validation
//! - `handlers.rs` - The `ToolHandler` trait and MCP result mapping
//! - `registry.rs` - Central tool registry and dispatch
//! - `router.rs` - Dynamic rmcp ToolRouter builder for STDIO transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Provide a `descriptor()` and implement `ToolHandler`
//! 3. Register it in `definitions::register_all`
//!
//! Both transports pick the tool up from the registry.

pub mod definitions;
pub mod descriptor;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use descriptor::{ParameterSpec, ToolDescriptor, ValueType};
pub use error::{BoxError, ToolError};
pub use handlers::*;
pub use registry::{RegisteredTool, ToolRegistry};
pub use router::build_tool_router;
