//! Credential-manager integration: code exchange against an in-process
//! token endpoint, persistence, and session restoration.
