//! Shared command-line configuration for the server binaries

use clap::Parser;
use homegraph_mcp_auth::AuthConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments shared by the three front-ends
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct ServeArgs {
    /// Port to bind (networked transports only)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind (networked transports only)
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Static bearer secret for the HTTP gate; unset disables the gate
    #[arg(long, env = "MCP_BEARER_TOKEN")]
    pub bearer_token: Option<String>,

    /// OAuth2 client credential file, used when the env blob is absent
    #[arg(long, env = "HOMEGRAPH_CREDENTIALS_FILE", default_value = "credentials.json")]
    pub credentials_file: PathBuf,

    /// Token store file
    #[arg(long, env = "HOMEGRAPH_TOKEN_FILE", default_value = "tokens.json")]
    pub token_file: PathBuf,
}

impl ServeArgs {
    /// Build the credential-manager configuration from the flags
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            credentials_path: self.credentials_file.clone(),
            token_path: self.token_file.clone(),
            ..AuthConfig::default()
        }
    }
}

/// Initialize tracing from `RUST_LOG`, falling back to the given directive
pub fn init_tracing(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();
}

/// Like [`init_tracing`] but logs to stderr, keeping stdout clean for
/// the stdio protocol stream.
pub fn init_stdio_tracing(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}
