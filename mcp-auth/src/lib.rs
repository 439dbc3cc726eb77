//! OAuth2 credential and token lifecycle for the HomeGraph MCP adapter
//!
//! This crate owns the only durable state in the system: the application's
//! OAuth2 client credential and the persisted token set obtained from an
//! authorization-code exchange. The [`CredentialManager`] exposes the
//! three-state authentication machine (unconfigured, unauthenticated,
//! authenticated) that the tool dispatcher gates on.
//!
//! Token expiry is deliberately not inspected: a present-but-expired
//! access token still counts as authenticated, and there is no
//! refresh-on-401 path. Downstream callers see upstream rejections
//! directly when that happens.

pub mod credentials;
pub mod error;
pub mod manager;
pub mod token;

pub use credentials::ClientCredentials;
pub use error::AuthError;
pub use manager::{AuthConfig, AuthState, CredentialManager, AUTH_ENDPOINT, SCOPES, TOKEN_ENDPOINT};
pub use token::{TokenSet, TokenStore};
