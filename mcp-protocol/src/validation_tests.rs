//! Tests for tool-argument validation

use crate::validation::validate_tool_arguments;
use serde_json::json;

fn command_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "command": { "type": "string" },
            "devices": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["command"]
    })
}

#[test]
fn test_accepts_valid_arguments() {
    let args = json!({"command": "turn on", "devices": ["lamp", "fan"]});
    assert!(validate_tool_arguments(&command_schema(), &args).is_ok());
}

#[test]
fn test_optional_field_may_be_absent() {
    let args = json!({"command": "turn off"});
    assert!(validate_tool_arguments(&command_schema(), &args).is_ok());
}

#[test]
fn test_missing_required_field() {
    let args = json!({"devices": ["lamp"]});
    let err = validate_tool_arguments(&command_schema(), &args).unwrap_err();
    assert!(err.message.contains("Missing required argument: command"));
}

#[test]
fn test_wrong_value_type() {
    let args = json!({"command": 42});
    let err = validate_tool_arguments(&command_schema(), &args).unwrap_err();
    assert!(err.message.contains("expected a string"));
}

#[test]
fn test_array_with_non_string_items() {
    let args = json!({"command": "on", "devices": ["lamp", 3]});
    let err = validate_tool_arguments(&command_schema(), &args).unwrap_err();
    assert!(err.message.contains("array of strings"));
}

#[test]
fn test_non_array_for_array_field() {
    let args = json!({"command": "on", "devices": "lamp"});
    assert!(validate_tool_arguments(&command_schema(), &args).is_err());
}

#[test]
fn test_null_arguments_treated_as_empty() {
    let empty_schema = json!({"type": "object", "properties": {}});
    assert!(validate_tool_arguments(&empty_schema, &serde_json::Value::Null).is_ok());

    // Null with required fields still fails
    let err = validate_tool_arguments(&command_schema(), &serde_json::Value::Null).unwrap_err();
    assert!(err.message.contains("Missing required argument"));
}

#[test]
fn test_non_object_arguments_rejected() {
    let empty_schema = json!({"type": "object", "properties": {}});
    assert!(validate_tool_arguments(&empty_schema, &json!([1, 2])).is_err());
}

#[test]
fn test_extra_properties_are_allowed() {
    let args = json!({"command": "on", "verbose": true});
    assert!(validate_tool_arguments(&command_schema(), &args).is_ok());
}
