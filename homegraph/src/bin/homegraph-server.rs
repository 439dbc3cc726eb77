//! Standalone HTTP+WebSocket front-end

use clap::Parser;
use homegraph_mcp::config::{init_tracing, ServeArgs};
use homegraph_mcp::{HomeGraphBackend, HomeGraphConfig};
use homegraph_mcp_server::{McpServer, ServerConfig, ToolBackend};
use homegraph_mcp_transport::{HttpServerConfig, TransportConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();
    init_tracing("homegraph_mcp=info");

    let port = args.port.unwrap_or(3000);
    info!(port, host = %args.host, "Starting HomeGraph MCP server (http)");

    let backend = HomeGraphBackend::initialize(HomeGraphConfig {
        auth: args.auth_config(),
    })
    .await?;

    let transport = TransportConfig::Http(HttpServerConfig {
        port,
        host: args.host.clone(),
        bearer_token: args.bearer_token.clone(),
    });

    let config = ServerConfig::new(backend.get_server_info(), transport);
    let mut server = McpServer::new(backend, config)?;
    server.run().await?;

    info!("HomeGraph MCP server stopped");
    Ok(())
}
