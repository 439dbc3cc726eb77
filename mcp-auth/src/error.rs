//! Error types for credential and token handling

use thiserror::Error;

/// Error type for credential manager operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// No OAuth2 client credential could be loaded from any source
    #[error("OAuth2 client not configured")]
    NotConfigured,

    /// An operation required a session that does not exist
    #[error("Not authenticated. Please authenticate first.")]
    NotAuthenticated,

    /// A credential source was present but unusable
    #[error("Invalid OAuth2 credentials: {0}")]
    Credentials(String),

    /// The authorization-code exchange was rejected or failed in transit
    #[error("Token exchange failed: {0}")]
    Exchange(String),

    /// The exchange exceeded the configured deadline
    #[error("Token exchange timed out")]
    Timeout,

    /// Reading or writing the token store failed
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A stored or received token document could not be (de)serialized
    #[error("Token serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
