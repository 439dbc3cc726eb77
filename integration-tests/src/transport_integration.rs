//! HTTP transports serving the real HomeGraph backend

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use homegraph_mcp::{HomeGraphBackend, HomeGraphConfig};
    use homegraph_mcp_protocol::Request;
    use homegraph_mcp_server::{GenericServerHandler, ToolBackend};
    use homegraph_mcp_transport::{
        FunctionConfig, HttpServerConfig, RequestHandler, Transport,
    };
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;

    async fn backend_handler(dir: &Path) -> RequestHandler {
        write_credentials(dir).await;
        let backend = HomeGraphBackend::initialize(HomeGraphConfig {
            auth: test_auth_config(dir),
        })
        .await
        .unwrap();
        let handler = GenericServerHandler::new(Arc::new(backend));
        Box::new(move |request: Request| {
            let handler = handler.clone();
            Box::pin(async move { handler.handle_request(request).await })
        })
    }

    #[tokio::test]
    async fn test_http_transport_serves_the_tool_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport =
            homegraph_mcp_transport::http::HttpTransport::with_config(HttpServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                bearer_token: Some("secret".to_string()),
            });
        transport.start(backend_handler(dir.path()).await).await.unwrap();
        let base = format!("http://{}", transport.local_addr().unwrap());

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{base}/mcp"))
            .header("Authorization", "Bearer secret")
            .body(r#"{"jsonrpc": "2.0", "method": "tools/list", "id": 1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        let tools = body["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[0]["name"], json!("get_auth_url"));

        transport.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_transport_rejects_wrong_bearer_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport =
            homegraph_mcp_transport::http::HttpTransport::with_config(HttpServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                bearer_token: Some("secret".to_string()),
            });
        transport.start(backend_handler(dir.path()).await).await.unwrap();
        let base = format!("http://{}", transport.local_addr().unwrap());

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{base}/mcp"))
            .header("Authorization", "Bearer wrong")
            .body(r#"{"jsonrpc": "2.0", "method": "tools/list", "id": 1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401);

        transport.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_function_transport_preserves_the_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport =
            homegraph_mcp_transport::function::FunctionTransport::with_config(FunctionConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                bearer_token: None,
            });
        transport.start(backend_handler(dir.path()).await).await.unwrap();
        let base = format!("http://{}", transport.local_addr().unwrap());

        let client = reqwest::Client::new();
        let request = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "list_devices", "arguments": {}},
            "id": 7,
        });
        let response = client
            .post(&base)
            .body(request.to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        // The dispatcher envelope travels through unchanged
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["result"]["isError"], json!(true));
        assert_eq!(
            body["result"]["content"][0]["text"],
            json!("Error: Not authenticated. Please authenticate first.")
        );

        transport.stop().await.unwrap();
    }
}
