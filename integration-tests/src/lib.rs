//! Integration tests for the HomeGraph MCP adapter
//!
//! These tests exercise the crates working together: the credential
//! manager against an in-process token endpoint, the backend through the
//! generic handler, and the HTTP transports end to end.

#![allow(unused_imports)] // Allow unused imports in integration tests

pub mod auth_flow;
pub mod end_to_end_scenarios;
pub mod transport_integration;

/// Common fixtures shared by the integration tests
pub mod test_utils {
    use axum::{routing::post, Json, Router};
    use homegraph_mcp_auth::AuthConfig;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    pub const CREDENTIAL_JSON: &str = r#"{
        "installed": {
            "client_id": "test-client.apps.googleusercontent.com",
            "client_secret": "test-secret",
            "redirect_uris": ["http://localhost:8085/callback"]
        }
    }"#;

    /// Auth config rooted in a temp dir with the env source disabled
    pub fn test_auth_config(dir: &Path) -> AuthConfig {
        AuthConfig {
            credentials_env: "HOMEGRAPH_TEST_UNSET_VAR".to_string(),
            credentials_path: dir.join("credentials.json"),
            token_path: dir.join("tokens.json"),
            ..AuthConfig::default()
        }
    }

    pub async fn write_credentials(dir: &Path) {
        tokio::fs::write(dir.join("credentials.json"), CREDENTIAL_JSON)
            .await
            .unwrap();
    }

    /// In-process stand-in for the provider's token endpoint.
    ///
    /// Accepts any code except `"bad-code"`; each grant carries a unique
    /// access token so tests can tell concurrent exchanges apart.
    pub struct MockTokenEndpoint {
        pub url: String,
        pub hits: Arc<AtomicU64>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl MockTokenEndpoint {
        pub async fn start() -> Self {
            Self::start_with_delay(Duration::ZERO).await
        }

        /// Start an endpoint that sleeps before answering, for exercising
        /// the exchange deadline.
        pub async fn start_with_delay(delay: Duration) -> Self {
            let hits = Arc::new(AtomicU64::new(0));
            let counter = hits.clone();

            let app = Router::new().route(
                "/token",
                post(move |body: String| {
                    let counter = counter.clone();
                    async move {
                        let n = counter.fetch_add(1, Ordering::SeqCst);
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        if body.contains("code=bad-code") {
                            return Err((
                                axum::http::StatusCode::BAD_REQUEST,
                                Json(json!({"error": "invalid_grant"})),
                            ));
                        }
                        Ok(Json(json!({
                            "access_token": format!("ya29.grant-{n}"),
                            "refresh_token": format!("1//refresh-{n}"),
                            "expires_in": 3599,
                            "scope": "https://www.googleapis.com/auth/homegraph",
                            "token_type": "Bearer",
                        })))
                    }
                }),
            );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr: SocketAddr = listener.local_addr().unwrap();
            let handle = tokio::spawn(async move {
                let _ = axum::serve(listener, app).await;
            });

            Self {
                url: format!("http://{addr}/token"),
                hits,
                handle,
            }
        }
    }

    impl Drop for MockTokenEndpoint {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }
}
