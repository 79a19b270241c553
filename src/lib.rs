//! Stock quote MCP server.
//!
//! This crate exposes a single tool, `cotacao`, over the Model Context
//! Protocol. It runs over HTTP (JSON-RPC over POST) or STDIO and can require
//! a static bearer token on HTTP.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the auth gate, the server
//!   handler, and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool descriptors, the registry, and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use cotacao_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};
