//! Serverless-style HTTP function transport
//!
//! Mirrors the cloud-function front-end: one `POST /` invocation route,
//! an open `GET /health` liveness route, the same static bearer gate as
//! the HTTP server, and CORS headers permitting any origin so browser
//! callers can reach the function directly. Locally the router is served
//! on a port, emulating the function host.

use crate::{
    http::{process_rpc, validate_bearer, HttpState},
    RequestHandler, Transport, TransportError,
};
use async_trait::async_trait;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response as AxumResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Configuration for the function transport
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    /// Port to bind to
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Static bearer secret; `None` disables the gate
    pub bearer_token: Option<String>,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            bearer_token: None,
        }
    }
}

/// Serverless-style function transport
pub struct FunctionTransport {
    config: FunctionConfig,
    local_addr: Option<SocketAddr>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl FunctionTransport {
    /// Create a new function transport on the given port
    pub fn new(port: u16) -> Self {
        Self::with_config(FunctionConfig {
            port,
            ..Default::default()
        })
    }

    /// Create a new function transport with custom configuration
    pub fn with_config(config: FunctionConfig) -> Self {
        Self {
            config,
            local_addr: None,
            server_handle: None,
        }
    }

    /// Address the function host is bound to, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Build the function router; exposed so a real function host can
    /// mount it without the local listener.
    pub fn router(handler: RequestHandler, bearer_token: Option<String>) -> Router {
        let state = HttpState {
            handler: Arc::new(handler),
            bearer_token,
        };

        Router::new()
            .route("/", post(handle_invoke))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
            .with_state(state)
    }
}

async fn handle_invoke(
    State(state): State<HttpState>,
    headers: HeaderMap,
    body: String,
) -> AxumResponse {
    if let Err(status) = validate_bearer(state.bearer_token.as_deref(), &headers) {
        return status.into_response();
    }

    process_rpc(&state.handler, body).await
}

async fn handle_health() -> AxumResponse {
    Json(json!({
        "status": "ok",
        "service": "homegraph-mcp-function",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

#[async_trait]
impl Transport for FunctionTransport {
    async fn start(&mut self, handler: RequestHandler) -> Result<(), TransportError> {
        if self.config.bearer_token.is_none() {
            warn!("no bearer secret configured; function endpoint is unauthenticated");
        }

        let app = FunctionTransport::router(handler, self.config.bearer_token.clone());

        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to bind {bind_addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| TransportError::Connection(format!("Failed to read bound address: {e}")))?;
        self.local_addr = Some(local_addr);

        info!("function transport listening on {}", local_addr);

        self.server_handle = Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("function host terminated: {}", e);
            }
        }));

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), TransportError> {
        info!("stopping function transport");
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

#[cfg(test)]
mod tests {
    use super::*;
    use homegraph_mcp_protocol::{Request, Response};

    fn echo_handler(
        request: Request,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>> {
        Box::pin(async move { Response::success(request.id, json!({"echo": request.method})) })
    }

    async fn started_function(bearer: Option<&str>) -> (FunctionTransport, String) {
        let mut transport = FunctionTransport::with_config(FunctionConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            bearer_token: bearer.map(String::from),
        });
        transport
            .start(Box::new(echo_handler))
            .await
            .expect("transport start");
        let base = format!("http://{}", transport.local_addr().unwrap());
        (transport, base)
    }

    #[tokio::test]
    async fn test_invoke_round_trip() {
        let (_transport, base) = started_function(Some("fn-secret")).await;
        let client = reqwest::Client::new();

        let response = client
            .post(&base)
            .header("Authorization", "Bearer fn-secret")
            .body(r#"{"jsonrpc": "2.0", "method": "tools/list", "id": 9}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["result"]["echo"], json!("tools/list"));
    }

    #[tokio::test]
    async fn test_invoke_requires_bearer() {
        let (_transport, base) = started_function(Some("fn-secret")).await;
        let client = reqwest::Client::new();

        let response = client
            .post(&base)
            .body(r#"{"jsonrpc": "2.0", "method": "ping", "id": 1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (_transport, base) = started_function(None).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{base}/health"))
            .header("Origin", "https://assistant.example")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let (_transport, base) = started_function(Some("fn-secret")).await;

        let response = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(response.status(), 200);
    }
}
