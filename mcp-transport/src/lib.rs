//! Transport front-ends for the HomeGraph MCP adapter
//!
//! Three interchangeable shells around one dispatch core: stdio for
//! assistant-local processes, a standalone HTTP server with a WebSocket
//! endpoint, and a serverless-style HTTP function. Every shell hands the
//! parsed JSON-RPC request to the same [`RequestHandler`] and returns the
//! handler's response unchanged; none of them reinterpret tool results.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use homegraph_mcp_transport::{TransportConfig, create_transport};
//! use homegraph_mcp_protocol::Response;
//!
//! let config = TransportConfig::http(3001);
//! let mut transport = create_transport(config);
//!
//! let handler = Box::new(|request: homegraph_mcp_protocol::Request| {
//!     Box::pin(async move {
//!         Response::success(request.id, serde_json::json!({"ok": true}))
//!     }) as std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
//! });
//! // transport.start(handler).await.unwrap();
//! # let _ = handler;
//! ```

pub mod config;
pub mod function;
pub mod http;
pub mod stdio;
pub mod validation;

use async_trait::async_trait;
use homegraph_mcp_protocol::{Request, Response};
use thiserror::Error as ThisError;

pub use config::TransportConfig;
pub use function::FunctionConfig;
pub use http::HttpServerConfig;
pub use stdio::StdioConfig;

#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error("Transport configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Request handler function type
pub type RequestHandler = Box<
    dyn Fn(Request) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
        + Send
        + Sync,
>;

/// Transport layer trait
#[async_trait]
pub trait Transport: Send + Sync {
    async fn start(&mut self, handler: RequestHandler) -> std::result::Result<(), TransportError>;
    async fn stop(&mut self) -> std::result::Result<(), TransportError>;
    async fn health_check(&self) -> std::result::Result<(), TransportError>;
}

/// Create a transport from configuration
pub fn create_transport(config: TransportConfig) -> Box<dyn Transport> {
    match config {
        TransportConfig::Stdio(config) => Box::new(stdio::StdioTransport::with_config(config)),
        TransportConfig::Http(config) => Box::new(http::HttpTransport::with_config(config)),
        TransportConfig::Function(config) => {
            Box::new(function::FunctionTransport::with_config(config))
        }
    }
}
