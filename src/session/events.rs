//! Events emitted by an agent session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of output from an agent session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Terminal outcome of the session.
    Result { outcome: Value, is_error: bool },
    /// Assistant turn with its ordered content fragments.
    Assistant { content: Vec<ContentFragment> },
    /// Any other tagged payload (`system`, `user`, ...).
    Other { kind: String },
}

/// A single content block of an assistant turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFragment {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: Some("text".to_string()),
            text: Some(text.into()),
        }
    }

    pub fn tagged(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            text: None,
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            kind: value.get("type").and_then(Value::as_str).map(String::from),
            text: value.get("text").and_then(Value::as_str).map(String::from),
        }
    }
}

impl SessionEvent {
    pub fn result(text: impl Into<String>) -> Self {
        Self::Result {
            outcome: Value::String(text.into()),
            is_error: false,
        }
    }

    pub fn error_result(text: impl Into<String>) -> Self {
        Self::Result {
            outcome: Value::String(text.into()),
            is_error: true,
        }
    }

    pub fn structured_result(outcome: Value) -> Self {
        Self::Result {
            outcome,
            is_error: false,
        }
    }

    pub fn assistant(content: Vec<ContentFragment>) -> Self {
        Self::Assistant { content }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::Assistant {
            content: vec![ContentFragment::text(text)],
        }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        Self::Other { kind: kind.into() }
    }

    /// Wire tag of the event.
    pub fn kind(&self) -> &str {
        match self {
            Self::Result { .. } => "result",
            Self::Assistant { .. } => "assistant",
            Self::Other { kind } => kind,
        }
    }

    /// Build an event from one decoded stream-json message.
    ///
    /// Result outcome is the `result` field when truthy, else the `error`
    /// field, else whatever `result` held (an empty string when absent).
    pub fn from_value(value: Value) -> crate::Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| crate::Error::Parse(format!("Event without type tag: {}", value)))?;

        match kind {
            "result" => {
                let result = value.get("result").filter(|v| !v.is_null());
                let outcome = result
                    .filter(|v| is_truthy(v))
                    .or_else(|| value.get("error").filter(|v| !v.is_null()))
                    .or(result)
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                let is_error = value
                    .get("is_error")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Ok(Self::Result { outcome, is_error })
            }
            "assistant" => {
                let content = value
                    .pointer("/message/content")
                    .and_then(Value::as_array)
                    .map(|blocks| blocks.iter().map(ContentFragment::from_value).collect())
                    .unwrap_or_default();
                Ok(Self::Assistant { content })
            }
            other => Ok(Self::Other {
                kind: other.to_string(),
            }),
        }
    }

    pub fn from_json_line(line: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(line.trim()).map_err(|e| {
            crate::Error::Parse(format!("Malformed session event: {} - line: {}", e, line))
        })?;
        Self::from_value(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_result() {
        let event = SessionEvent::from_json_line(
            r#"{"type":"result","subtype":"success","is_error":false,"result":"done","num_turns":3}"#,
        )
        .unwrap();
        assert_eq!(event, SessionEvent::result("done"));
        assert_eq!(event.kind(), "result");
    }

    #[test]
    fn test_parse_result_falls_back_to_error_field() {
        let event = SessionEvent::from_value(json!({
            "type": "result",
            "subtype": "error_max_turns",
            "is_error": true,
            "result": "",
            "error": {"code": 7}
        }))
        .unwrap();
        assert_eq!(
            event,
            SessionEvent::Result {
                outcome: json!({"code": 7}),
                is_error: true
            }
        );
    }

    #[test]
    fn test_parse_result_without_outcome() {
        let event = SessionEvent::from_value(json!({"type": "result"})).unwrap();
        assert_eq!(event, SessionEvent::result(""));

        let event = SessionEvent::from_value(json!({"type": "result", "result": null}));
        assert_eq!(event.unwrap(), SessionEvent::result(""));
    }

    #[test]
    fn test_parse_empty_result_is_kept() {
        let event = SessionEvent::from_json_line(r#"{"type":"result","result":""}"#);
        assert_eq!(event.unwrap(), SessionEvent::result(""));
    }

    #[test]
    fn test_parse_assistant() {
        let event = SessionEvent::from_value(json!({
            "type": "assistant",
            "message": {
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Looking at the code"},
                    {"type": "tool_use", "id": "t1", "name": "Read", "input": {}}
                ]
            }
        }))
        .unwrap();

        match event {
            SessionEvent::Assistant { content } => {
                assert_eq!(content.len(), 2);
                assert_eq!(content[0].text.as_deref(), Some("Looking at the code"));
                assert_eq!(content[1], ContentFragment::tagged("tool_use"));
            }
            other => panic!("Expected assistant event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_assistant_without_message() {
        let event = SessionEvent::from_value(json!({"type": "assistant"})).unwrap();
        assert_eq!(event, SessionEvent::assistant(vec![]));
    }

    #[test]
    fn test_parse_other() {
        let event =
            SessionEvent::from_json_line(r#"{"type":"system","subtype":"init","tools":[]}"#).unwrap();
        assert_eq!(event, SessionEvent::other("system"));
        assert_eq!(event.kind(), "system");
    }

    #[test]
    fn test_malformed_line() {
        let err = SessionEvent::from_json_line("not json").unwrap_err();
        assert!(matches!(err, crate::Error::Parse(_)));

        let err = SessionEvent::from_json_line(r#"{"result":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("type tag"));
    }
}
