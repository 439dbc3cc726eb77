//! The fixed tool catalog exposed to MCP clients

use homegraph_mcp_protocol::Tool;
use serde_json::json;

/// One catalog entry: the advertised tool plus its dispatch policy
#[derive(Debug, Clone)]
pub struct ToolEntry {
    pub tool: Tool,
    /// Whether the dispatcher checks for an established session first
    pub requires_auth: bool,
}

/// Build the catalog in its advertised order.
///
/// The catalog is static for the lifetime of the process; `tools/list`
/// returns it verbatim and `listChanged` is advertised as false.
pub fn catalog() -> Vec<ToolEntry> {
    vec![
        ToolEntry {
            tool: Tool {
                name: "get_auth_url".to_string(),
                description: "Get the Google OAuth2 authorization URL to start authentication"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            requires_auth: false,
        },
        ToolEntry {
            tool: Tool {
                name: "authenticate".to_string(),
                description: "Complete authentication with the authorization code from Google"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "code": {
                            "type": "string",
                            "description": "The authorization code from the OAuth2 redirect"
                        }
                    },
                    "required": ["code"]
                }),
            },
            requires_auth: false,
        },
        ToolEntry {
            tool: Tool {
                name: "list_devices".to_string(),
                description: "List all Google Home devices linked to the account".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            requires_auth: true,
        },
        ToolEntry {
            tool: Tool {
                name: "execute_command".to_string(),
                description: "Execute a command on one or more Google Home devices".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "command": {
                            "type": "string",
                            "description": "The command to execute, e.g. 'turn on the lights'"
                        },
                        "devices": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Target device names (optional; all devices if omitted)"
                        }
                    },
                    "required": ["command"]
                }),
            },
            requires_auth: true,
        },
        ToolEntry {
            tool: Tool {
                name: "query_devices".to_string(),
                description: "Query the current state of Google Home devices".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "devices": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Device names to query (optional; all devices if omitted)"
                        }
                    }
                }),
            },
            requires_auth: true,
        },
        ToolEntry {
            tool: Tool {
                name: "get_device_states".to_string(),
                description: "Get the HomeGraph state of specific devices by id".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "deviceIds": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "HomeGraph device ids"
                        }
                    },
                    "required": ["deviceIds"]
                }),
            },
            requires_auth: true,
        },
    ]
}
