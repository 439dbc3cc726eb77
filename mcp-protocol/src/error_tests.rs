//! Tests for protocol error types

use crate::error::{Error, ErrorCode};
use serde_json::json;

#[test]
fn test_error_constructors() {
    let err = Error::tool_not_found("bogus_tool");
    assert_eq!(err.code, ErrorCode::ToolNotFound);
    assert_eq!(err.message, "Tool not found: bogus_tool");
    assert!(err.data.is_none());

    let err = Error::validation_error("bad shape");
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = Error::method_not_found("tools/destroy");
    assert_eq!(err.message, "Method not found: tools/destroy");
}

#[test]
fn test_error_display() {
    let err = Error::unauthorized("no session");
    assert_eq!(err.to_string(), "Unauthorized: no session");
}

#[test]
fn test_error_serializes_numeric_code() {
    let err = Error::invalid_params("missing code");
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["code"], json!(-32602));
    assert!(value["code"].is_i64());
    assert_eq!(value["message"], json!("missing code"));
    assert!(value.get("data").is_none());
}

#[test]
fn test_error_code_round_trips_through_the_wire() {
    for code in [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
        ErrorCode::Unauthorized,
        ErrorCode::ToolNotFound,
        ErrorCode::ValidationError,
    ] {
        let wire = serde_json::to_value(code).unwrap();
        let back: ErrorCode = serde_json::from_value(wire).unwrap();
        assert_eq!(back, code);
    }
}

#[test]
fn test_unknown_error_code_is_rejected() {
    assert!(serde_json::from_value::<ErrorCode>(json!(-31999)).is_err());
    assert!(serde_json::from_value::<ErrorCode>(json!("-32700")).is_err());
}

#[test]
fn test_from_serde_json_error() {
    let parse_failure = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: Error = parse_failure.into();
    assert_eq!(err.code, ErrorCode::ParseError);
}
