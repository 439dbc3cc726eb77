//! Credential manager: the OAuth2 client and its state machine

use crate::credentials::ClientCredentials;
use crate::error::AuthError;
use crate::token::{TokenResponse, TokenSet, TokenStore};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

/// Google authorization endpoint
pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google token endpoint
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for every authorization: HomeGraph control and
/// assistant prototype access
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/homegraph",
    "https://www.googleapis.com/auth/assistant-sdk-prototype",
];

/// Configuration for the credential manager
///
/// The endpoints default to Google's and are overridable so tests can
/// point the exchange at an in-process mock.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Environment variable checked first for a credential JSON blob
    pub credentials_env: String,
    /// Fallback credential file path
    pub credentials_path: PathBuf,
    /// Token store path
    pub token_path: PathBuf,
    /// OAuth2 authorization endpoint
    pub auth_endpoint: String,
    /// OAuth2 token endpoint
    pub token_endpoint: String,
    /// Deadline for the code-exchange call
    pub http_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_env: "HOMEGRAPH_CREDENTIALS".to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("tokens.json"),
            auth_endpoint: AUTH_ENDPOINT.to_string(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

/// Derived authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No OAuth2 client credential is loaded
    Unconfigured,
    /// Credential loaded, no access token held
    Unauthenticated,
    /// Credential loaded and an access token is present
    Authenticated,
}

/// Owns the OAuth2 client credential and the current token set.
///
/// The token cell is the only shared mutable state in the adapter. Reads
/// (`is_authenticated`, `access_token`) take the read lock; the single
/// mutation path is [`CredentialManager::exchange_code`], serialized by an
/// internal mutex so concurrent exchanges cannot interleave the persist
/// step.
pub struct CredentialManager {
    credentials: Option<ClientCredentials>,
    tokens: RwLock<Option<TokenSet>>,
    store: TokenStore,
    http: reqwest::Client,
    config: AuthConfig,
    exchange_lock: Mutex<()>,
}

impl CredentialManager {
    /// Attempt to establish a usable OAuth2 client.
    ///
    /// Missing credential sources leave the manager unconfigured instead
    /// of failing, so the authorization-URL flow stays reachable and the
    /// operator can complete setup interactively. A previously persisted
    /// token set is restored without any network call.
    pub async fn initialize(config: AuthConfig) -> Result<Self, AuthError> {
        let credentials =
            ClientCredentials::load(&config.credentials_env, &config.credentials_path).await?;

        let store = TokenStore::new(config.token_path.clone());
        let tokens = match &credentials {
            Some(creds) => {
                debug!(client_id = %creds.client_id, "OAuth2 client configured");
                store.load().await
            }
            None => {
                warn!(
                    env = %config.credentials_env,
                    path = %config.credentials_path.display(),
                    "no OAuth2 credentials found; starting unconfigured"
                );
                None
            }
        };

        if tokens.is_some() {
            info!("restored prior session from token store");
        }

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Exchange(format!("could not construct HTTP client: {e}")))?;

        Ok(Self {
            credentials,
            tokens: RwLock::new(tokens),
            store,
            http,
            config,
            exchange_lock: Mutex::new(()),
        })
    }

    /// Build the authorization-request URL.
    ///
    /// Deterministic for a given credential: offline access plus the fixed
    /// scope pair, no provider-side nonce. Callable repeatedly with no
    /// side effects.
    pub fn authorization_url(&self) -> Result<String, AuthError> {
        let creds = self.credentials.as_ref().ok_or(AuthError::NotConfigured)?;

        let mut url = Url::parse(&self.config.auth_endpoint)
            .map_err(|e| AuthError::Credentials(format!("invalid authorization endpoint: {e}")))?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline")
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("client_id", &creds.client_id)
            .append_pair("redirect_uri", &creds.redirect_uri);

        Ok(url.into())
    }

    /// Exchange an authorization code for a token set.
    ///
    /// On success the grant is published in memory and then persisted
    /// atomically, overwriting any prior grant. On failure the prior
    /// state, in memory and on disk, is untouched.
    pub async fn exchange_code(&self, code: &str) -> Result<(), AuthError> {
        let creds = self.credentials.as_ref().ok_or(AuthError::NotConfigured)?;

        let _guard = self.exchange_lock.lock().await;

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &creds.client_id),
            ("client_secret", &creds.client_secret),
            ("redirect_uri", &creds.redirect_uri),
        ];

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::Timeout
                } else {
                    AuthError::Exchange(format!("token request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Exchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let granted: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Exchange(format!("invalid token response: {e}")))?;

        let tokens = TokenSet::from_response(granted, Utc::now());

        {
            let mut cell = self.tokens.write().await;
            *cell = Some(tokens.clone());
        }
        self.store.save(&tokens).await?;

        info!("authorization code exchanged; session established");
        Ok(())
    }

    /// Pure predicate: a client exists and holds a non-empty access token.
    ///
    /// No network call and no expiry check.
    pub async fn is_authenticated(&self) -> bool {
        if self.credentials.is_none() {
            return false;
        }
        let tokens = self.tokens.read().await;
        tokens
            .as_ref()
            .is_some_and(|t| !t.access_token.is_empty())
    }

    /// Current access token for a downstream HomeGraph client.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        if self.credentials.is_none() {
            return Err(AuthError::NotConfigured);
        }
        let tokens = self.tokens.read().await;
        tokens
            .as_ref()
            .filter(|t| !t.access_token.is_empty())
            .map(|t| t.access_token.clone())
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Derive the three-state machine value
    pub async fn auth_state(&self) -> AuthState {
        if self.credentials.is_none() {
            AuthState::Unconfigured
        } else if self.is_authenticated().await {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Path of the backing token store (exposed for tests and diagnostics)
    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }
}
