//! Standalone HTTP server transport with a WebSocket endpoint
//!
//! Routes:
//! - `POST /mcp` — JSON-RPC request in, JSON-RPC response out
//! - `GET /ws` — accepts the upgrade and acknowledges the connection;
//!   frames are drained without MCP parsing (clients use `/mcp` for
//!   protocol traffic)
//! - `GET /health` — open liveness endpoint with a fixed status payload
//!
//! `/mcp` and `/ws` sit behind a static bearer-token gate compared
//! against a configured secret; when no secret is configured the gate is
//! disabled with a warning.

use crate::{
    validation::extract_id_from_malformed, RequestHandler, Transport, TransportError,
};
use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
    routing::{get, post},
    Json, Router,
};
use futures_util::StreamExt;
use homegraph_mcp_protocol::{Error as McpError, Request, Response};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Configuration for the HTTP server transport
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Port to bind to
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Static bearer secret; `None` disables the gate
    pub bearer_token: Option<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            bearer_token: None,
        }
    }
}

/// Shared state for the HTTP routes
#[derive(Clone)]
pub(crate) struct HttpState {
    pub(crate) handler: Arc<RequestHandler>,
    pub(crate) bearer_token: Option<String>,
}

/// HTTP transport for the MCP protocol
pub struct HttpTransport {
    config: HttpServerConfig,
    local_addr: Option<SocketAddr>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl HttpTransport {
    /// Create a new HTTP transport on the given port
    pub fn new(port: u16) -> Self {
        Self::with_config(HttpServerConfig {
            port,
            ..Default::default()
        })
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpServerConfig) -> Self {
        Self {
            config,
            local_addr: None,
            server_handle: None,
        }
    }

    /// Address the server is bound to, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    fn router(state: HttpState) -> Router {
        Router::new()
            .route("/mcp", post(handle_mcp))
            .route("/ws", get(handle_ws))
            .route("/health", get(handle_health))
            .with_state(state)
    }
}

/// Check the `Authorization: Bearer` header against the configured secret
pub(crate) fn validate_bearer(
    expected: Option<&str>,
    headers: &HeaderMap,
) -> Result<(), StatusCode> {
    let Some(expected) = expected else {
        // Gate disabled
        return Ok(());
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => Ok(()),
        Some(_) => {
            warn!("rejected request with invalid bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            warn!("rejected request without bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Parse a JSON-RPC body, run it through the handler, and reply.
///
/// Malformed envelopes are rejected here with a 400 carrying a JSON-RPC
/// error body; they never reach the dispatch core. Notifications get an
/// empty 204.
pub(crate) async fn process_rpc(handler: &RequestHandler, body: String) -> AxumResponse {
    let request: Request = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("rejecting malformed request envelope: {}", e);
            let error = Response::error(
                extract_id_from_malformed(&body),
                McpError::parse_error(format!("Invalid JSON: {e}")),
            );
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    debug!(method = %request.method, "handling HTTP request");

    let is_notification = request.is_notification();
    let response = handler(request).await;

    if is_notification {
        return StatusCode::NO_CONTENT.into_response();
    }

    Json(response).into_response()
}

async fn handle_mcp(
    State(state): State<HttpState>,
    headers: HeaderMap,
    body: String,
) -> AxumResponse {
    if let Err(status) = validate_bearer(state.bearer_token.as_deref(), &headers) {
        return status.into_response();
    }

    process_rpc(&state.handler, body).await
}

async fn handle_ws(
    State(state): State<HttpState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> AxumResponse {
    if let Err(status) = validate_bearer(state.bearer_token.as_deref(), &headers) {
        return status.into_response();
    }

    ws.on_upgrade(handle_socket)
}

/// Acknowledge the connection, then drain frames without MCP parsing
async fn handle_socket(mut socket: WebSocket) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "WebSocket connection established");

    let ack = json!({
        "type": "connection_ack",
        "connectionId": connection_id,
    });
    if socket.send(Message::Text(ack.to_string())).await.is_err() {
        debug!(%connection_id, "WebSocket closed before acknowledgement");
        return;
    }

    while let Some(frame) = socket.next().await {
        match frame {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(other) => {
                debug!(%connection_id, "ignoring WebSocket frame: {:?}", other);
            }
        }
    }

    info!(%connection_id, "WebSocket connection closed");
}

async fn handle_health() -> AxumResponse {
    Json(json!({
        "status": "ok",
        "service": "homegraph-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start(&mut self, handler: RequestHandler) -> Result<(), TransportError> {
        if self.config.bearer_token.is_none() {
            warn!("no bearer secret configured; HTTP endpoints are unauthenticated");
        }

        let state = HttpState {
            handler: Arc::new(handler),
            bearer_token: self.config.bearer_token.clone(),
        };
        let app = HttpTransport::router(state);

        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to bind {bind_addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| TransportError::Connection(format!("Failed to read bound address: {e}")))?;
        self.local_addr = Some(local_addr);

        info!("HTTP transport listening on {}", local_addr);

        self.server_handle = Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("HTTP server terminated: {}", e);
            }
        }));

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), TransportError> {
        info!("stopping HTTP transport");
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
        self.local_addr = None;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        match &self.server_handle {
            Some(handle) if !handle.is_finished() => Ok(()),
            _ => Err(TransportError::Connection(
                "Transport not running".to_string(),
            )),
        }
    }
}
