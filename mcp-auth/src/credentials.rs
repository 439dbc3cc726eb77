//! OAuth2 client credential loading
//!
//! Credentials are resolved once at startup from one of two sources, in
//! order: a JSON blob in an environment variable, then a JSON file at a
//! fixed project-relative path. Both use the Google client-secret file
//! shape (an `installed` or `web` object). Absence of both sources is a
//! soft failure; a present but malformed source is a hard one.

use crate::error::AuthError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// The application's OAuth2 client identity, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// First entry of the credential file's `redirect_uris` list
    pub redirect_uri: String,
}

/// Google client-secret file layout
#[derive(Debug, Deserialize)]
struct CredentialFile {
    installed: Option<OAuthClientInfo>,
    web: Option<OAuthClientInfo>,
}

#[derive(Debug, Deserialize)]
struct OAuthClientInfo {
    client_id: String,
    client_secret: String,
    redirect_uris: Vec<String>,
}

impl ClientCredentials {
    /// Parse a credential JSON document (`installed` or `web` shape)
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        let file: CredentialFile = serde_json::from_str(raw)
            .map_err(|e| AuthError::Credentials(format!("malformed credential JSON: {e}")))?;

        let info = file.installed.or(file.web).ok_or_else(|| {
            AuthError::Credentials("expected an 'installed' or 'web' object".to_string())
        })?;

        let redirect_uri = info.redirect_uris.into_iter().next().ok_or_else(|| {
            AuthError::Credentials("credential has an empty redirect_uris list".to_string())
        })?;

        Ok(Self {
            client_id: info.client_id,
            client_secret: info.client_secret,
            redirect_uri,
        })
    }

    /// Resolve credentials from the environment variable, then the file.
    ///
    /// Returns `Ok(None)` when neither source exists so the caller can
    /// continue unconfigured and still serve the authorization-URL flow.
    pub async fn load(env_var: &str, path: &Path) -> Result<Option<Self>, AuthError> {
        if let Ok(raw) = std::env::var(env_var) {
            debug!(source = env_var, "loading OAuth2 credentials from environment");
            return Self::from_json(&raw).map(Some);
        }

        match tokio::fs::read_to_string(path).await {
            Ok(raw) => {
                debug!(source = %path.display(), "loading OAuth2 credentials from file");
                Self::from_json(&raw).map(Some)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::Storage(e)),
        }
    }
}
