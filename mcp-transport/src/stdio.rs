//! Standard I/O transport
//!
//! Newline-delimited JSON-RPC on stdin/stdout, one message per line.
//! Malformed input is answered with a JSON-RPC error response carrying
//! whatever id can be salvaged; notifications produce no output line.

use crate::{
    validation::{extract_id_from_malformed, validate_message_string},
    RequestHandler, Transport, TransportError,
};
use async_trait::async_trait;
use homegraph_mcp_protocol::{Error as McpError, Request, Response};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

/// Configuration for stdio transport
#[derive(Debug, Clone)]
pub struct StdioConfig {
    /// Maximum message size in bytes
    pub max_message_size: usize,
    /// Enable message validation
    pub validate_messages: bool,
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self {
            max_message_size: crate::validation::DEFAULT_MAX_MESSAGE_SIZE,
            validate_messages: true,
        }
    }
}

/// Standard I/O transport for the MCP protocol
pub struct StdioTransport {
    running: Arc<AtomicBool>,
    config: StdioConfig,
}

impl StdioTransport {
    /// Create a new stdio transport with default configuration
    pub fn new() -> Self {
        Self::with_config(StdioConfig::default())
    }

    /// Create a new stdio transport with custom configuration
    pub fn with_config(config: StdioConfig) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Read newline-delimited requests until EOF or stop.
    ///
    /// Clears the running flag on every exit path so `health_check`
    /// reports the transport as stopped once the peer closes the stream.
    async fn serve<R, W>(
        &self,
        mut reader: R,
        writer: &mut W,
        handler: &RequestHandler,
    ) -> Result<(), TransportError>
    where
        R: tokio::io::AsyncBufRead + Unpin,
        W: tokio::io::AsyncWrite + Unpin,
    {
        let mut line = String::new();

        while self.running.load(Ordering::Relaxed) {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("EOF reached, stopping stdio transport");
                    break;
                }
                Ok(_) => {
                    let trimmed = line.trim_end_matches(['\n', '\r']);
                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Err(e) = self.process_line(trimmed, handler, writer).await {
                        // Keep serving subsequent messages
                        error!("failed to process line: {}", e);
                    }
                }
                Err(e) => {
                    error!("failed to read from stdin: {}", e);
                    self.running.store(false, Ordering::Relaxed);
                    return Err(TransportError::Connection(format!("Stdin read error: {e}")));
                }
            }
        }

        self.running.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Process a single line from stdin
    async fn process_line<W: tokio::io::AsyncWrite + Unpin>(
        &self,
        line: &str,
        handler: &RequestHandler,
        stdout: &mut W,
    ) -> Result<(), TransportError> {
        if self.config.validate_messages {
            if let Err(e) = validate_message_string(line, Some(self.config.max_message_size)) {
                warn!("message validation failed: {}", e);
                let response = Response::error(
                    extract_id_from_malformed(line),
                    McpError::invalid_request(format!("Message validation failed: {e}")),
                );
                return self.send_response(stdout, &response).await;
            }
        }

        debug!("processing message: {}", line);

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("failed to parse JSON-RPC request: {}", e);
                let response = Response::error(
                    extract_id_from_malformed(line),
                    McpError::parse_error(format!("Invalid JSON: {e}")),
                );
                return self.send_response(stdout, &response).await;
            }
        };

        let is_notification = request.is_notification();
        let response = handler(request).await;

        if is_notification {
            debug!("no response needed for notification");
            return Ok(());
        }

        self.send_response(stdout, &response).await
    }

    /// Serialize and send a response to stdout
    async fn send_response<W: tokio::io::AsyncWrite + Unpin>(
        &self,
        stdout: &mut W,
        response: &Response,
    ) -> Result<(), TransportError> {
        let line = serde_json::to_string(response)
            .map_err(|e| TransportError::Protocol(format!("Failed to serialize response: {e}")))?;

        if self.config.validate_messages {
            if let Err(e) = validate_message_string(&line, Some(self.config.max_message_size)) {
                return Err(TransportError::Protocol(format!(
                    "Outgoing message validation failed: {e}"
                )));
            }
        }

        debug!("sending response: {}", line);

        let framed = format!("{line}\n");
        stdout
            .write_all(framed.as_bytes())
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to write to stdout: {e}")))?;
        stdout
            .flush()
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to flush stdout: {e}")))?;

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn start(&mut self, handler: RequestHandler) -> Result<(), TransportError> {
        info!("starting stdio transport");
        self.running.store(true, Ordering::Relaxed);

        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let result = self.serve(BufReader::new(stdin), &mut stdout, &handler).await;

        info!("stdio transport stopped");
        result
    }

    async fn stop(&mut self) -> Result<(), TransportError> {
        info!("stopping stdio transport");
        self.running.store(false, Ordering::Relaxed);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        if self.running.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(TransportError::Connection(
                "Transport not running".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock_handler(
        request: Request,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>> {
        Box::pin(async move {
            if request.method == "error_method" {
                Response::error(request.id, McpError::method_not_found("error_method"))
            } else {
                Response::success(request.id, json!({"echo": request.method}))
            }
        })
    }

    #[tokio::test]
    async fn test_stdio_config() {
        let config = StdioConfig {
            max_message_size: 1024,
            validate_messages: true,
        };

        let transport = StdioTransport::with_config(config);
        assert_eq!(transport.config.max_message_size, 1024);
        assert!(transport.config.validate_messages);
    }

    #[test]
    fn test_default_config() {
        let config = StdioConfig::default();
        assert_eq!(config.max_message_size, 10 * 1024 * 1024);
        assert!(config.validate_messages);
    }

    #[tokio::test]
    async fn test_health_check_tracks_running_flag() {
        let transport = StdioTransport::new();
        assert!(transport.health_check().await.is_err());

        transport.running.store(true, Ordering::Relaxed);
        assert!(transport.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_eof_marks_transport_stopped() {
        let transport = StdioTransport::new();
        transport.running.store(true, Ordering::Relaxed);
        assert!(transport.health_check().await.is_ok());

        let handler: RequestHandler = Box::new(mock_handler);
        let input: &[u8] = b"{\"jsonrpc\": \"2.0\", \"method\": \"ping\", \"id\": 1}\n";
        let mut output = Vec::new();
        transport
            .serve(BufReader::new(input), &mut output, &handler)
            .await
            .unwrap();

        // The stream ended, so liveness probes must now fail
        assert!(transport.health_check().await.is_err());

        let written = String::from_utf8(output).unwrap();
        let response: Response = serde_json::from_str(written.trim_end()).unwrap();
        assert_eq!(response.id, json!(1));
        assert_eq!(response.result.unwrap()["echo"], json!("ping"));
    }

    #[tokio::test]
    async fn test_serve_skips_output_for_notifications() {
        let transport = StdioTransport::new();
        transport.running.store(true, Ordering::Relaxed);

        let handler: RequestHandler = Box::new(mock_handler);
        let input: &[u8] = b"{\"jsonrpc\": \"2.0\", \"method\": \"notifications/initialized\"}\n";
        let mut output = Vec::new();
        transport
            .serve(BufReader::new(input), &mut output, &handler)
            .await
            .unwrap();

        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_handler_sees_parsed_request() {
        let handler: RequestHandler = Box::new(mock_handler);
        let request: Request =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "method": "tools/list", "id": 5}"#).unwrap();

        let response = handler(request).await;
        assert_eq!(response.id, json!(5));
        assert_eq!(response.result.unwrap()["echo"], json!("tools/list"));
    }
}
