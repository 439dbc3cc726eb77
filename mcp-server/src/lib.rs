//! Generic MCP server for tool-only backends
//!
//! This crate connects a [`ToolBackend`] (the domain-specific tool
//! catalog and dispatcher) to any transport front-end. The handler owns
//! the JSON-RPC method routing; the backend owns the tool semantics; the
//! transport owns the wire. All three transports share this one dispatch
//! path, so tool behavior cannot drift between them.

pub mod backend;
pub mod handler;
pub mod server;


pub use backend::{BackendError, ToolBackend};
pub use handler::GenericServerHandler;
pub use server::{HealthStatus, McpServer, ServerConfig, ServerError};
