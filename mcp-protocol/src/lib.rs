//! Core Model Context Protocol types for the HomeGraph adapter
//!
//! This crate provides the JSON-RPC 2.0 envelope, the MCP tool types, and
//! the structural validation applied to tool arguments before a tool is
//! executed. It is the shared vocabulary between the transports, the
//! generic server handler, and the HomeGraph tool backend.
//!
//! # Quick Start
//!
//! ```rust
//! use homegraph_mcp_protocol::{Tool, Content, CallToolResult};
//! use serde_json::json;
//!
//! let tool = Tool {
//!     name: "list_devices".to_string(),
//!     description: "List all Google Home devices".to_string(),
//!     input_schema: json!({
//!         "type": "object",
//!         "properties": {}
//!     }),
//! };
//!
//! let result = CallToolResult::text("Found 3 devices");
//! assert_eq!(result.is_error, Some(false));
//! # let _ = tool;
//! ```

pub mod error;
pub mod model;
pub mod validation;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod model_tests;
#[cfg(test)]
mod validation_tests;

// Re-export core types for easy access
pub use error::{Error, ErrorCode, McpResult, Result};
pub use model::*;
pub use validation::validate_tool_arguments;

/// Protocol version implemented by this adapter
pub const MCP_VERSION: &str = "2024-11-05";
