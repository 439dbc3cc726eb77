//! Generic MCP server implementation

use crate::{backend::ToolBackend, handler::GenericServerHandler};
use homegraph_mcp_protocol::ServerInfo;
use homegraph_mcp_transport::{create_transport, Transport, TransportConfig};

use std::sync::Arc;
use thiserror::Error;
use tokio::signal;
use tracing::{info, warn};

/// Error type for server operations
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Server already running")]
    AlreadyRunning,

    #[error("Server not running")]
    NotRunning,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server implementation information
    pub server_info: ServerInfo,

    /// Transport configuration
    pub transport_config: TransportConfig,

    /// Enable graceful shutdown on Ctrl+C
    pub graceful_shutdown: bool,
}

impl ServerConfig {
    /// Build a configuration from server info and a transport choice
    pub fn new(server_info: ServerInfo, transport_config: TransportConfig) -> Self {
        Self {
            server_info,
            transport_config,
            graceful_shutdown: true,
        }
    }
}

/// Generic MCP server with pluggable backend
pub struct McpServer<B: ToolBackend> {
    backend: Arc<B>,
    handler: GenericServerHandler<B>,
    transport: Box<dyn Transport>,
    config: ServerConfig,
    running: Arc<tokio::sync::RwLock<bool>>,
}

impl<B: ToolBackend + 'static> McpServer<B> {
    /// Create a new MCP server with the given backend and configuration
    pub fn new(backend: B, config: ServerConfig) -> std::result::Result<Self, ServerError> {
        info!("Initializing MCP server");

        let transport = create_transport(config.transport_config.clone());

        let backend = Arc::new(backend);
        let handler = GenericServerHandler::new(backend.clone());

        Ok(Self {
            backend,
            handler,
            transport,
            config,
            running: Arc::new(tokio::sync::RwLock::new(false)),
        })
    }

    /// Start the server
    pub async fn start(&mut self) -> std::result::Result<(), ServerError> {
        {
            let mut running = self.running.write().await;
            if *running {
                return Err(ServerError::AlreadyRunning);
            }
            *running = true;
        }

        info!("Starting MCP server");

        self.backend
            .on_startup()
            .await
            .map_err(|e| ServerError::Backend(e.to_string()))?;

        let handler = self.handler.clone();
        self.transport
            .start(Box::new(move |request| {
                let handler = handler.clone();
                Box::pin(async move { handler.handle_request(request).await })
            }))
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        info!("MCP server started");

        if self.config.graceful_shutdown {
            let running = self.running.clone();
            tokio::spawn(async move {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("failed to listen for shutdown signal: {}", e);
                    return;
                }
                warn!("shutdown signal received");
                let mut running = running.write().await;
                *running = false;
            });
        }

        Ok(())
    }

    /// Stop the server gracefully
    pub async fn stop(&mut self) -> std::result::Result<(), ServerError> {
        {
            let mut running = self.running.write().await;
            if !*running {
                return Err(ServerError::NotRunning);
            }
            *running = false;
        }

        info!("Stopping MCP server");

        self.transport
            .stop()
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        self.backend
            .on_shutdown()
            .await
            .map_err(|e| ServerError::Backend(e.to_string()))?;

        info!("MCP server stopped");
        Ok(())
    }

    /// Run the server until the transport ends or a shutdown signal arrives
    pub async fn run(&mut self) -> std::result::Result<(), ServerError> {
        self.start().await?;

        loop {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            if !*self.running.read().await {
                break;
            }

            // Stdio ends on its own when stdin closes
            if self.transport.health_check().await.is_err() {
                let mut running = self.running.write().await;
                *running = false;
            }
        }

        // A transport-initiated exit already flipped the flag, so skip
        // the NotRunning check and tear down directly.
        info!("Stopping MCP server");
        self.transport
            .stop()
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;
        self.backend
            .on_shutdown()
            .await
            .map_err(|e| ServerError::Backend(e.to_string()))?;
        info!("MCP server stopped");

        Ok(())
    }

    /// Get server health status
    pub async fn health_check(&self) -> HealthStatus {
        let backend_healthy = self.backend.health_check().await.is_ok();
        let transport_healthy = self.transport.health_check().await.is_ok();

        HealthStatus {
            status: if backend_healthy && transport_healthy {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            components: vec![
                ("backend".to_string(), backend_healthy),
                ("transport".to_string(), transport_healthy),
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Get server information
    pub fn get_server_info(&self) -> &ServerInfo {
        &self.config.server_info
    }

    /// Check if server is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

/// Health status information
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub components: std::collections::HashMap<String, bool>,
}
