//! Structural validation of tool arguments against a declared input schema
//!
//! Every tool in the catalog declares a JSON-schema-shaped argument
//! description (`type: object` with `string` and array-of-`string`
//! properties). The dispatcher runs this check before any side effect, so
//! a malformed call never reaches the credential manager or the device
//! layer.

use crate::error::{Error, McpResult};
use serde_json::Value;

/// Validate an arguments object against a tool's input schema.
///
/// `arguments` of `Null` is treated as an empty object, matching how MCP
/// clients omit the field for zero-argument tools. The first violation is
/// reported; extra properties not named by the schema are permitted.
pub fn validate_tool_arguments(schema: &Value, arguments: &Value) -> McpResult<()> {
    let empty = serde_json::Map::new();
    let args = match arguments {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => {
            return Err(Error::validation_error(
                "Invalid arguments: expected an object",
            ))
        }
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(field) {
                return Err(Error::validation_error(format!(
                    "Missing required argument: {field}"
                )));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (name, prop_schema) in properties {
        let Some(value) = args.get(name) else {
            continue;
        };
        validate_property(name, prop_schema, value)?;
    }

    Ok(())
}

fn validate_property(name: &str, prop_schema: &Value, value: &Value) -> McpResult<()> {
    match prop_schema.get("type").and_then(Value::as_str) {
        Some("string") => {
            if !value.is_string() {
                return Err(Error::validation_error(format!(
                    "Invalid argument '{name}': expected a string"
                )));
            }
        }
        Some("array") => {
            let Some(items) = value.as_array() else {
                return Err(Error::validation_error(format!(
                    "Invalid argument '{name}': expected an array of strings"
                )));
            };
            let item_type = prop_schema
                .get("items")
                .and_then(|i| i.get("type"))
                .and_then(Value::as_str);
            if item_type == Some("string") && !items.iter().all(Value::is_string) {
                return Err(Error::validation_error(format!(
                    "Invalid argument '{name}': expected an array of strings"
                )));
            }
        }
        // Schema without a recognized type constraint accepts any value
        _ => {}
    }

    Ok(())
}
