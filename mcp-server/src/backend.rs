//! Backend trait for pluggable tool implementations

use async_trait::async_trait;
use homegraph_mcp_protocol::{
    CallToolRequestParam, CallToolResult, Error, ListToolsResult, PaginatedRequestParam,
    ServerInfo,
};
use std::error::Error as StdError;
use thiserror::Error;

/// Error type for backend operations
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend not initialized")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal backend error: {0}")]
    Internal(String),

    #[error("Custom error: {0}")]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl BackendError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn custom(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(error))
    }
}

/// Convert BackendError to MCP protocol Error
impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotInitialized => Error::internal_error("Backend not initialized"),
            BackendError::Configuration(msg) => Error::invalid_params(msg),
            BackendError::Internal(msg) => Error::internal_error(msg),
            BackendError::Custom(err) => Error::internal_error(err.to_string()),
        }
    }
}

/// Main trait for tool backends
///
/// A backend owns a fixed tool catalog and the dispatch of calls against
/// it, while the framework handles the MCP protocol and the transports.
/// This adapter's backends expose tools only; there is no resource or
/// prompt surface.
#[async_trait]
pub trait ToolBackend: Send + Sync + Clone {
    /// Backend-specific error type
    type Error: StdError + Send + Sync + Into<Error> + From<BackendError> + 'static;

    /// Backend configuration type
    type Config: Clone + Send + Sync;

    /// Initialize the backend with configuration.
    ///
    /// Called once during startup; establishes connections and loads any
    /// persisted state before the first request arrives.
    async fn initialize(config: Self::Config) -> std::result::Result<Self, Self::Error>;

    /// Get server information and capabilities
    fn get_server_info(&self) -> ServerInfo;

    /// Health check for the backend
    async fn health_check(&self) -> std::result::Result<(), Self::Error>;

    /// List available tools
    async fn list_tools(
        &self,
        request: PaginatedRequestParam,
    ) -> std::result::Result<ListToolsResult, Self::Error>;

    /// Execute a tool with the given parameters
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> std::result::Result<CallToolResult, Self::Error>;

    /// Called when the server is starting up
    async fn on_startup(&self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    /// Called when the server is shutting down
    async fn on_shutdown(&self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}
