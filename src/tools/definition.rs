//! Tool definition handed to the orchestrating agent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Input accepted by the tool: one natural-language instruction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskInput {
    /// The coding task to perform
    pub input: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Definition whose input schema is derived from [`TaskInput`].
    pub fn for_task(name: impl Into<String>, description: impl Into<String>) -> Self {
        let schema = schemars::schema_for!(TaskInput);
        let input_schema =
            serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));
        Self::new(name, description, input_schema)
    }
}

impl TaskInput {
    /// Extract the instruction from a host payload: either a bare JSON string
    /// or an object with an `input` field. Anything else is used as its
    /// compact JSON text.
    pub fn from_payload(payload: serde_json::Value) -> Self {
        match payload {
            serde_json::Value::String(input) => Self { input },
            other => serde_json::from_value::<TaskInput>(other.clone())
                .unwrap_or_else(|_| Self {
                    input: other.to_string(),
                }),
        }
    }
}
