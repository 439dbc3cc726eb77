//! Stdio front-end for assistant-local MCP clients

use clap::Parser;
use homegraph_mcp::config::{init_stdio_tracing, ServeArgs};
use homegraph_mcp::{HomeGraphBackend, HomeGraphConfig};
use homegraph_mcp_server::{McpServer, ServerConfig, ToolBackend};
use homegraph_mcp_transport::TransportConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();
    init_stdio_tracing("homegraph_mcp=info");

    info!("Starting HomeGraph MCP server (stdio)");

    let backend = HomeGraphBackend::initialize(HomeGraphConfig {
        auth: args.auth_config(),
    })
    .await?;

    let config = ServerConfig::new(backend.get_server_info(), TransportConfig::stdio());
    let mut server = McpServer::new(backend, config)?;
    server.run().await?;

    info!("HomeGraph MCP server stopped");
    Ok(())
}
