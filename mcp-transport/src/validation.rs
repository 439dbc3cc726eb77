//! Message validation shared by the transports
//!
//! Stdio messages are newline-delimited, so embedded newlines in an
//! outgoing message would corrupt the stream; both directions are also
//! bounded in size. The id-extraction helper lets a transport answer a
//! malformed request with the caller's id when one can still be salvaged.

use serde_json::Value;
use thiserror::Error;

/// Default cap on a single message (10 MB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Message is empty")]
    Empty,

    #[error("Message exceeds maximum size of {0} bytes")]
    TooLarge(usize),

    #[error("Message contains an embedded newline")]
    EmbeddedNewline,
}

/// Validate a message string for newline-delimited framing
pub fn validate_message_string(
    message: &str,
    max_size: Option<usize>,
) -> Result<(), ValidationError> {
    if message.is_empty() {
        return Err(ValidationError::Empty);
    }

    let limit = max_size.unwrap_or(DEFAULT_MAX_MESSAGE_SIZE);
    if message.len() > limit {
        return Err(ValidationError::TooLarge(limit));
    }

    if message.contains('\n') || message.contains('\r') {
        return Err(ValidationError::EmbeddedNewline);
    }

    Ok(())
}

/// Best-effort extraction of the request id from a malformed message.
///
/// Valid JSON yields the `id` field directly; truncated JSON falls back
/// to scanning for an `"id"` key. Null when nothing can be recovered, per
/// the JSON-RPC error-response rules.
pub fn extract_id_from_malformed(text: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return value.get("id").cloned().unwrap_or(Value::Null);
    }

    let Some(key_pos) = text.find("\"id\"") else {
        return Value::Null;
    };
    let rest = &text[key_pos + 4..];
    let Some(colon) = rest.find(':') else {
        return Value::Null;
    };
    let token = rest[colon + 1..].trim_start();

    if let Some(quoted) = token.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            return Value::String(quoted[..end].to_string());
        }
        return Value::Null;
    }

    let end = token
        .find(|c: char| !c.is_ascii_digit() && c != '-')
        .unwrap_or(token.len());
    serde_json::from_str(&token[..end]).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_normal_message() {
        let line = r#"{"jsonrpc": "2.0", "method": "ping", "id": 1}"#;
        assert!(validate_message_string(line, None).is_ok());
    }

    #[test]
    fn test_rejects_empty_message() {
        assert!(matches!(
            validate_message_string("", None),
            Err(ValidationError::Empty)
        ));
    }

    #[test]
    fn test_rejects_oversized_message() {
        let line = "x".repeat(64);
        assert!(matches!(
            validate_message_string(&line, Some(32)),
            Err(ValidationError::TooLarge(32))
        ));
    }

    #[test]
    fn test_rejects_embedded_newline() {
        let line = "{\"method\": \"te\nst\"}";
        assert!(matches!(
            validate_message_string(line, None),
            Err(ValidationError::EmbeddedNewline)
        ));
    }

    #[test]
    fn test_extract_id_from_valid_json() {
        let text = r#"{"jsonrpc": "2.0", "method": "test", "id": 123}"#;
        assert_eq!(extract_id_from_malformed(text), json!(123));

        let text = r#"{"jsonrpc": "2.0", "method": "test", "id": "abc"}"#;
        assert_eq!(extract_id_from_malformed(text), json!("abc"));
    }

    #[test]
    fn test_extract_id_from_truncated_json() {
        let text = r#"{"jsonrpc": "2.0", "method": "test", "id": 456"#;
        assert_eq!(extract_id_from_malformed(text), json!(456));

        let text = r#"{"jsonrpc": "2.0", "id": "trunc", "me"#;
        assert_eq!(extract_id_from_malformed(text), json!("trunc"));
    }

    #[test]
    fn test_extract_id_absent() {
        let text = r#"{"jsonrpc": "2.0", "method": "test"}"#;
        assert_eq!(extract_id_from_malformed(text), Value::Null);

        assert_eq!(extract_id_from_malformed("garbage"), Value::Null);
    }
}
