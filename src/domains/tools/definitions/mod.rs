//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod quote;

pub use quote::{FIXED_QUOTE, FixedQuoteSource, QuoteParams, QuoteSource, QuoteTool};

use super::{ToolError, ToolRegistry};

/// Register every tool shipped with the server.
pub fn register_all(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register(QuoteTool::descriptor(), QuoteTool::default())?;
    Ok(())
}
