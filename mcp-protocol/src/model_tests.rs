//! Tests for protocol model types

use crate::model::*;
use serde_json::json;

#[test]
fn test_request_notification_detection() {
    let request: Request =
        serde_json::from_str(r#"{"jsonrpc": "2.0", "method": "tools/list", "id": 1}"#).unwrap();
    assert!(!request.is_notification());

    let notification: Request =
        serde_json::from_str(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
            .unwrap();
    assert!(notification.is_notification());
    assert_eq!(notification.params, serde_json::Value::Null);
}

#[test]
fn test_response_builders() {
    let ok = Response::success(json!(7), json!({"tools": []}));
    assert_eq!(ok.jsonrpc, "2.0");
    assert_eq!(ok.id, json!(7));
    assert!(ok.error.is_none());

    let err = Response::error(json!("abc"), crate::Error::method_not_found("nope"));
    assert!(err.result.is_none());
    assert!(err.error.is_some());
}

#[test]
fn test_response_skips_absent_fields() {
    let ok = Response::success(json!(1), json!({}));
    let wire = serde_json::to_value(&ok).unwrap();
    assert!(wire.get("error").is_none());
}

#[test]
fn test_call_tool_result_helpers() {
    let ok = CallToolResult::text("3 devices found");
    assert_eq!(ok.is_error, Some(false));
    assert_eq!(ok.content.len(), 1);
    assert_eq!(ok.content[0].as_text(), "3 devices found");

    let err = CallToolResult::error_text("Error: something broke");
    assert_eq!(err.is_error, Some(true));
    assert!(err.content[0].as_text().starts_with("Error: "));
}

#[test]
fn test_call_tool_result_wire_format() {
    let result = CallToolResult::text("ok");
    let wire = serde_json::to_value(&result).unwrap();
    assert_eq!(wire["isError"], json!(false));
    assert_eq!(wire["content"][0]["type"], json!("text"));
    assert_eq!(wire["content"][0]["text"], json!("ok"));
}

#[test]
fn test_tool_serializes_camel_case_schema() {
    let tool = Tool {
        name: "authenticate".to_string(),
        description: "Exchange an authorization code".to_string(),
        input_schema: json!({"type": "object", "required": ["code"]}),
    };
    let wire = serde_json::to_value(&tool).unwrap();
    assert!(wire.get("inputSchema").is_some());
    assert!(wire.get("input_schema").is_none());
}

#[test]
fn test_capabilities_tools_only() {
    let caps = ServerCapabilities::tools_only();
    let wire = serde_json::to_value(&caps).unwrap();
    assert_eq!(wire["tools"]["listChanged"], json!(false));
}
