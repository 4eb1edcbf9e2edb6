//! Decoding of raw reply values into reply text.

use serde_json::Value;

/// Turn a successful raw reply into the text stored on the turn.
///
/// - a bare string is used as is;
/// - an object with a string at `data.reply` yields that string;
/// - anything else is serialized to JSON text.
///
/// An empty result also falls back to the serialized value so a successful
/// reply never leaves the turn blank.
#[must_use]
pub fn extract_reply(raw: &Value) -> String {
    let text = match raw {
        Value::String(text) => Some(text.as_str()),
        other => other.pointer("/data/reply").and_then(Value::as_str),
    };

    match text {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_string() {
        assert_eq!(extract_reply(&json!("Use the Register page.")), "Use the Register page.");
    }

    #[test]
    fn test_nested_data_reply() {
        let raw = json!({ "data": { "reply": "Use the Register page." }, "status": "ok" });
        assert_eq!(extract_reply(&raw), "Use the Register page.");
    }

    #[test]
    fn test_unrecognized_shape_is_serialized() {
        let raw = json!({ "response": "hello", "model": "m" });
        let text = extract_reply(&raw);
        assert!(text.contains("\"response\":\"hello\""));
        assert!(text.contains("\"model\":\"m\""));
    }

    #[test]
    fn test_non_string_data_reply_is_serialized() {
        let raw = json!({ "data": { "reply": 42 } });
        assert_eq!(extract_reply(&raw), r#"{"data":{"reply":42}}"#);
    }

    #[test]
    fn test_empty_string_never_blank() {
        assert_eq!(extract_reply(&json!("")), "\"\"");
        assert_eq!(extract_reply(&Value::Null), "null");
    }
}
