//! Reduction of buffered session events into the tool's result string.

use serde_json::Value;

use crate::session::SessionEvent;

pub const TASK_LABEL: &str = "Claude Code";
pub const NO_OUTPUT_SENTINEL: &str =
    "Claude Code executed successfully but no output was generated.";

/// Reduce events in priority order:
///
/// 1. the first result event's outcome, error or not;
/// 2. the first text fragment of the last assistant event;
/// 3. [`NO_OUTPUT_SENTINEL`].
pub fn reduce(events: &[SessionEvent]) -> String {
    if let Some(outcome) = events.iter().find_map(|event| match event {
        SessionEvent::Result { outcome, .. } => Some(outcome),
        _ => None,
    }) {
        return outcome_text(outcome);
    }

    events
        .iter()
        .rev()
        .find_map(|event| match event {
            SessionEvent::Assistant { content } => Some(content),
            _ => None,
        })
        .and_then(|content| content.first())
        .and_then(|fragment| fragment.text.as_deref())
        .filter(|text| !text.is_empty())
        .map(String::from)
        .unwrap_or_else(|| NO_OUTPUT_SENTINEL.to_string())
}

/// Strings pass through; anything else becomes compact JSON with sorted keys.
pub fn outcome_text(outcome: &Value) -> String {
    match outcome {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn error_text(error: &crate::Error) -> String {
    format!("Error executing {}: {}", TASK_LABEL, error)
}
