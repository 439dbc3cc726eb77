//! Token set representation and durable storage
//!
//! One token set per deployment: the store holds exactly the last grant,
//! overwritten wholesale on each successful exchange. Writes go through a
//! temp sibling file followed by a rename so a failed write can never
//! truncate the previous grant.

use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A granted OAuth2 token bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Absolute expiry computed from the provider's `expires_in`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// Raw token-endpoint response body
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenSet {
    /// Build a token set from a provider response received at `now`
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            scope: response.scope,
            token_type: response.token_type,
            expiry: response.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// JSON-file store for the deployment's single token set
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted token set, if any.
    ///
    /// An absent or unreadable file restores no session; the manager
    /// proceeds unauthenticated rather than failing startup.
    pub async fn load(&self) -> Option<TokenSet> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read token store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => {
                debug!(path = %self.path.display(), "restored persisted token set");
                Some(tokens)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "token store is unreadable, ignoring");
                None
            }
        }
    }

    /// Persist a token set, replacing any prior grant.
    ///
    /// The document is written to a temp sibling and renamed into place;
    /// on failure the previous file is left untouched.
    pub async fn save(&self, tokens: &TokenSet) -> Result<(), AuthError> {
        let raw = serde_json::to_string_pretty(tokens)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, raw.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "persisted token set");
        Ok(())
    }
}
