//! Generic request handler for the MCP protocol

use crate::backend::ToolBackend;
use homegraph_mcp_protocol::{
    CallToolRequestParam, Error, InitializeRequestParam, InitializeResult, PaginatedRequestParam,
    Request, Response, MCP_VERSION,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Generic server handler that implements the MCP protocol
#[derive(Clone)]
pub struct GenericServerHandler<B: ToolBackend> {
    backend: Arc<B>,
}

impl<B: ToolBackend> GenericServerHandler<B> {
    /// Create a new handler
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Handle an MCP request.
    ///
    /// Failures never escape as transport-level errors: every fallible
    /// route is downgraded to a JSON-RPC error response carrying the
    /// request id.
    pub async fn handle_request(&self, request: Request) -> Response {
        debug!(method = %request.method, "handling request");

        let request_id = request.id.clone();

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "ping" => self.handle_ping(request).await,
            "tools/list" => self.handle_list_tools(request).await,
            "tools/call" => self.handle_call_tool(request).await,
            method if method.starts_with("notifications/") => {
                debug!(method, "acknowledging notification");
                // Transports drop responses to notifications
                return Response::success(request_id, serde_json::Value::Null);
            }
            method => {
                warn!(method, "unknown method requested");
                Err(Error::method_not_found(method))
            }
        };

        match result {
            Ok(response) => response,
            Err(error) => {
                warn!("request failed: {}", error);
                Response::error(request_id, error)
            }
        }
    }

    async fn handle_initialize(&self, request: Request) -> Result<Response, Error> {
        let _params: InitializeRequestParam = serde_json::from_value(request.params)?;

        let info = self.backend.get_server_info();
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: info.capabilities,
            server_info: info.server_info,
            instructions: info.instructions,
        };

        Ok(Response::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_ping(&self, request: Request) -> Result<Response, Error> {
        Ok(Response::success(
            request.id,
            serde_json::Value::Object(Default::default()),
        ))
    }

    async fn handle_list_tools(&self, request: Request) -> Result<Response, Error> {
        let params: PaginatedRequestParam = if request.params.is_null() {
            PaginatedRequestParam::default()
        } else {
            serde_json::from_value(request.params)?
        };

        let result = self
            .backend
            .list_tools(params)
            .await
            .map_err(|e| e.into())?;

        Ok(Response::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_call_tool(&self, request: Request) -> Result<Response, Error> {
        let params: CallToolRequestParam = serde_json::from_value(request.params)?;

        let result = self.backend.call_tool(params).await.map_err(|e| e.into())?;

        Ok(Response::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }
}
