//! Transport configuration

use crate::function::FunctionConfig;
use crate::http::HttpServerConfig;
use crate::stdio::StdioConfig;

/// Transport configuration
#[derive(Debug, Clone)]
pub enum TransportConfig {
    /// Standard I/O transport (for assistant-local MCP clients)
    Stdio(StdioConfig),

    /// Standalone HTTP server with a WebSocket endpoint
    Http(HttpServerConfig),

    /// Serverless-style HTTP function front-end
    Function(FunctionConfig),
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::stdio()
    }
}

impl TransportConfig {
    /// Create stdio transport configuration
    pub fn stdio() -> Self {
        Self::Stdio(StdioConfig::default())
    }

    /// Create HTTP server transport configuration
    pub fn http(port: u16) -> Self {
        Self::Http(HttpServerConfig {
            port,
            ..HttpServerConfig::default()
        })
    }

    /// Create function transport configuration
    pub fn function(port: u16) -> Self {
        Self::Function(FunctionConfig {
            port,
            ..FunctionConfig::default()
        })
    }
}
