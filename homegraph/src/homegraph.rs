//! HomeGraph device-control client
//!
//! Every call resolves the current access token before doing anything,
//! so an expired session surfaces as the same failure everywhere. The
//! device actions themselves are placeholders that describe what would
//! be performed; they keep the validated-argument, auth-gated contract
//! that a real HomeGraph call will inherit.

use homegraph_mcp_auth::{AuthError, CredentialManager};
use std::sync::Arc;
use tracing::debug;

/// Client for the Google HomeGraph device-control surface
#[derive(Clone)]
pub struct HomeGraphClient {
    auth: Arc<CredentialManager>,
}

impl HomeGraphClient {
    pub fn new(auth: Arc<CredentialManager>) -> Self {
        Self { auth }
    }

    // TODO: issue the real HomeGraph requests (devices.query /
    // devices.requestSync) with the resolved bearer token instead of
    // describing the action.

    /// List the devices linked to the authenticated account
    pub async fn list_devices(&self) -> Result<String, AuthError> {
        let _token = self.auth.access_token().await?;
        debug!("listing devices");
        Ok("Devices linked to this account: (device listing pending HomeGraph sync)".to_string())
    }

    /// Execute an assistant command against the given devices
    pub async fn execute_command(
        &self,
        command: &str,
        devices: &[String],
    ) -> Result<String, AuthError> {
        let _token = self.auth.access_token().await?;
        debug!(command, ?devices, "executing command");
        Ok(format!(
            "Executing command '{}' on {}",
            command,
            describe_targets(devices)
        ))
    }

    /// Query the current state of the given devices
    pub async fn query_devices(&self, devices: &[String]) -> Result<String, AuthError> {
        let _token = self.auth.access_token().await?;
        debug!(?devices, "querying devices");
        Ok(format!("Querying state of {}", describe_targets(devices)))
    }

    /// Fetch HomeGraph state for specific device ids
    pub async fn device_states(&self, device_ids: &[String]) -> Result<String, AuthError> {
        let _token = self.auth.access_token().await?;
        debug!(?device_ids, "fetching device states");
        Ok(format!(
            "HomeGraph state for devices: {}",
            device_ids.join(", ")
        ))
    }
}

fn describe_targets(devices: &[String]) -> String {
    if devices.is_empty() {
        "all devices".to_string()
    } else {
        format!("devices: {}", devices.join(", "))
    }
}
