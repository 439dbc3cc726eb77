//! Google Home / HomeGraph MCP server
//!
//! Exposes a fixed catalog of six tools over the Model Context Protocol:
//! two authentication operations (`get_auth_url`, `authenticate`) and
//! four auth-gated device operations (`list_devices`, `execute_command`,
//! `query_devices`, `get_device_states`). One backend serves all three
//! front-ends (stdio, HTTP+WebSocket, serverless function), so tool
//! behavior is identical regardless of transport.

pub mod backend;
pub mod config;
pub mod homegraph;
pub mod tools;


pub use backend::{HomeGraphBackend, HomeGraphConfig, HomeGraphError};
pub use homegraph::HomeGraphClient;
pub use tools::{catalog, ToolEntry};
