//! HomeGraph tool backend: the dispatcher behind `tools/call`
//!
//! Every dispatch runs the same pipeline: resolve the catalog entry,
//! validate arguments against its schema, check the authentication gate,
//! then execute. Apart from an unknown tool name, which is a protocol
//! error, every failure is rendered as an `Error: `-prefixed text result
//! so the calling assistant always receives renderable text.

use crate::homegraph::HomeGraphClient;
use crate::tools::{catalog, ToolEntry};
use async_trait::async_trait;
use homegraph_mcp_auth::{AuthConfig, AuthError, AuthState, CredentialManager};
use homegraph_mcp_protocol::{
    validate_tool_arguments, CallToolRequestParam, CallToolResult, Error, Implementation,
    ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, MCP_VERSION,
};
use homegraph_mcp_server::BackendError;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};

/// Backend error type
#[derive(Debug, ThisError)]
pub enum HomeGraphError {
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<HomeGraphError> for Error {
    fn from(err: HomeGraphError) -> Self {
        match err {
            HomeGraphError::UnknownTool(name) => Error::tool_not_found(name),
            HomeGraphError::InvalidArguments(msg) => Error::validation_error(msg),
            HomeGraphError::Auth(e) => Error::unauthorized(e.to_string()),
            HomeGraphError::Backend(e) => e.into(),
        }
    }
}

/// Configuration for the HomeGraph backend
#[derive(Debug, Clone, Default)]
pub struct HomeGraphConfig {
    pub auth: AuthConfig,
}

/// The HomeGraph MCP backend
#[derive(Clone)]
pub struct HomeGraphBackend {
    auth: Arc<CredentialManager>,
    client: HomeGraphClient,
    tools: Arc<Vec<ToolEntry>>,
}

impl HomeGraphBackend {
    /// Shared credential manager (exposed for diagnostics and tests)
    pub fn credential_manager(&self) -> &Arc<CredentialManager> {
        &self.auth
    }

    /// Execute one catalog operation with already-validated arguments.
    ///
    /// Failures returned here are caught by `call_tool` and enveloped.
    async fn dispatch(&self, entry: &ToolEntry, args: &Value) -> Result<String, HomeGraphError> {
        validate_tool_arguments(&entry.tool.input_schema, args)
            .map_err(|e| HomeGraphError::InvalidArguments(e.message))?;

        if entry.requires_auth && !self.auth.is_authenticated().await {
            return Err(AuthError::NotAuthenticated.into());
        }

        match entry.tool.name.as_str() {
            "get_auth_url" => {
                if self.auth.is_authenticated().await {
                    Ok("Already authenticated. You can control your devices directly.".to_string())
                } else {
                    let url = self.auth.authorization_url()?;
                    Ok(format!(
                        "Please visit this URL to authorize the application:\n{url}"
                    ))
                }
            }
            "authenticate" => {
                let code = required_str(args, "code")?;
                self.auth.exchange_code(code).await?;
                info!("authentication completed");
                Ok("Authentication successful. You can now control your Google Home devices."
                    .to_string())
            }
            "list_devices" => Ok(self.client.list_devices().await?),
            "execute_command" => {
                let command = required_str(args, "command")?;
                let devices = string_list(args, "devices");
                Ok(self.client.execute_command(command, &devices).await?)
            }
            "query_devices" => {
                let devices = string_list(args, "devices");
                Ok(self.client.query_devices(&devices).await?)
            }
            "get_device_states" => {
                let ids = string_list(args, "deviceIds");
                Ok(self.client.device_states(&ids).await?)
            }
            name => Err(HomeGraphError::UnknownTool(name.to_string())),
        }
    }
}

/// Fetch a required string argument; validation has already checked it,
/// so a miss here means the schema and the dispatch arm disagree.
fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, HomeGraphError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| HomeGraphError::InvalidArguments(format!("Missing required argument: {key}")))
}

fn string_list(args: &Value, key: &str) -> Vec<String> {
    args.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl homegraph_mcp_server::ToolBackend for HomeGraphBackend {
    type Error = HomeGraphError;
    type Config = HomeGraphConfig;

    async fn initialize(config: Self::Config) -> Result<Self, Self::Error> {
        info!("Initializing HomeGraph backend");

        let auth = Arc::new(CredentialManager::initialize(config.auth).await?);
        if auth.auth_state().await == AuthState::Unconfigured {
            warn!("no OAuth2 credentials; only get_auth_url guidance is available");
        }

        let client = HomeGraphClient::new(auth.clone());

        Ok(Self {
            auth,
            client,
            tools: Arc::new(catalog()),
        })
    }

    fn get_server_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::tools_only(),
            server_info: Implementation {
                name: "homegraph-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Control Google Home devices. Start with get_auth_url, then authenticate \
                 with the authorization code before using the device tools."
                    .to_string(),
            ),
        }
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
    ) -> Result<ListToolsResult, Self::Error> {
        Ok(ListToolsResult {
            tools: self.tools.iter().map(|e| e.tool.clone()).collect(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, Self::Error> {
        let entry = self
            .tools
            .iter()
            .find(|e| e.tool.name == request.name)
            .ok_or_else(|| HomeGraphError::UnknownTool(request.name.clone()))?;

        let args = request.arguments.unwrap_or(Value::Null);

        match self.dispatch(entry, &args).await {
            Ok(text) => {
                debug!(tool = %entry.tool.name, "tool call succeeded");
                Ok(CallToolResult::text(text))
            }
            Err(e) => {
                warn!(tool = %entry.tool.name, "tool call failed: {}", e);
                Ok(CallToolResult::error_text(format!("Error: {e}")))
            }
        }
    }
}
