//! End-to-end scenarios: backend behind the generic handler

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use homegraph_mcp::{HomeGraphBackend, HomeGraphConfig};
    use homegraph_mcp_auth::{AuthConfig, AuthError, CredentialManager, AUTH_ENDPOINT};
    use homegraph_mcp_protocol::{ErrorCode, Request, Response};
    use homegraph_mcp_server::{GenericServerHandler, ToolBackend};
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;

    async fn handler_for(
        dir: &Path,
        token_endpoint: Option<&str>,
    ) -> GenericServerHandler<HomeGraphBackend> {
        let mut auth = test_auth_config(dir);
        if let Some(endpoint) = token_endpoint {
            auth.token_endpoint = endpoint.to_string();
        }
        let backend = HomeGraphBackend::initialize(HomeGraphConfig { auth })
            .await
            .unwrap();
        GenericServerHandler::new(Arc::new(backend))
    }

    fn call_request(name: &str, arguments: Value, id: u64) -> Request {
        Request {
            jsonrpc: "2.0".to_string(),
            method: "tools/call".to_string(),
            params: json!({"name": name, "arguments": arguments}),
            id: json!(id),
        }
    }

    fn result_text(response: &Response) -> String {
        let result = response.result.as_ref().expect("successful result");
        result["content"][0]["text"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_scenario_unconfigured_manager_cannot_authorize() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CredentialManager::initialize(test_auth_config(dir.path()))
            .await
            .unwrap();

        assert!(!manager.is_authenticated().await);
        assert!(matches!(
            manager.authorization_url(),
            Err(AuthError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_scenario_get_auth_url_through_the_handler() {
        let dir = tempfile::tempdir().unwrap();
        write_credentials(dir.path()).await;
        let handler = handler_for(dir.path(), None).await;

        let response = handler
            .handle_request(call_request("get_auth_url", json!({}), 1))
            .await;

        let text = result_text(&response);
        let (sentence, url) = text.split_once('\n').unwrap();
        assert_eq!(sentence, "Please visit this URL to authorize the application:");
        assert!(url.starts_with(AUTH_ENDPOINT));
    }

    #[tokio::test]
    async fn test_scenario_missing_device_ids_is_enveloped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_credentials(dir.path()).await;
        let handler = handler_for(dir.path(), None).await;

        let response = handler
            .handle_request(call_request("get_device_states", json!({}), 2))
            .await;

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        assert_eq!(
            result["content"][0]["text"],
            json!("Error: Missing required argument: deviceIds")
        );
    }

    #[tokio::test]
    async fn test_scenario_unknown_tool_is_a_protocol_error() {
        let dir = tempfile::tempdir().unwrap();
        write_credentials(dir.path()).await;
        let handler = handler_for(dir.path(), None).await;

        let response = handler
            .handle_request(call_request("make_coffee", json!({}), 3))
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::ToolNotFound);
    }

    #[tokio::test]
    async fn test_scenario_full_authentication_flow() {
        let dir = tempfile::tempdir().unwrap();
        write_credentials(dir.path()).await;
        let endpoint = MockTokenEndpoint::start().await;
        let handler = handler_for(dir.path(), Some(&endpoint.url)).await;

        // Device tools are gated before authentication
        let response = handler
            .handle_request(call_request("list_devices", json!({}), 10))
            .await;
        assert_eq!(
            response.result.unwrap()["content"][0]["text"],
            json!("Error: Not authenticated. Please authenticate first.")
        );

        // Authenticate with a code
        let response = handler
            .handle_request(call_request("authenticate", json!({"code": "4/abc"}), 11))
            .await;
        let text = result_text(&response);
        assert!(text.starts_with("Authentication successful"));

        // Device tools now work and get_auth_url reports the session
        let response = handler
            .handle_request(call_request("list_devices", json!({}), 12))
            .await;
        assert_eq!(response.result.unwrap()["isError"], json!(false));

        let response = handler
            .handle_request(call_request("get_auth_url", json!({}), 13))
            .await;
        assert!(result_text(&response).starts_with("Already authenticated"));
    }

    #[tokio::test]
    async fn test_tools_list_advertises_the_full_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write_credentials(dir.path()).await;
        let handler = handler_for(dir.path(), None).await;

        let response = handler
            .handle_request(Request {
                jsonrpc: "2.0".to_string(),
                method: "tools/list".to_string(),
                params: Value::Null,
                id: json!(20),
            })
            .await;

        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 6);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }
}
