//! Configuration Validation Layer
//!
//! Checks raw tool parameters before they are deserialized into a
//! [`ToolConfig`](super::ToolConfig).

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde_json::Value;

use super::{ConfigError, ConfigResult, ValidationErrors};
use crate::models::ModelFamily;

pub type ValidationFn = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

pub const MAX_TURNS_RANGE: RangeInclusive<i64> = 1..=100;
pub const TIMEOUT_SECS_RANGE: RangeInclusive<i64> = 30..=600;
pub const TOOL_TOKEN_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*$";

pub struct ConfigValidator {
    type_rules: BTreeMap<String, ValueType>,
    range_rules: BTreeMap<String, RangeInclusive<i64>>,
    pattern_rules: BTreeMap<String, regex::Regex>,
    custom_rules: BTreeMap<String, ValidationFn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ValueType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Number => value.is_number(),
            ValueType::Boolean => value.is_boolean(),
            ValueType::Array => value.is_array(),
            ValueType::Object => value.is_object(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self {
            type_rules: BTreeMap::new(),
            range_rules: BTreeMap::new(),
            pattern_rules: BTreeMap::new(),
            custom_rules: BTreeMap::new(),
        }
    }

    /// Rules for the tool parameter object. Every key is optional; present
    /// keys must have the right shape and range.
    pub fn tool_config() -> ConfigResult<Self> {
        Ok(Self::new()
            .expect_type("name", ValueType::String)
            .expect_type("description", ValueType::String)
            .expect_type("model", ValueType::String)
            .expect_type("maxTurns", ValueType::Number)
            .expect_type("timeout", ValueType::Number)
            .expect_type("allowedTools", ValueType::Array)
            .expect_type("additionalOptions", ValueType::Object)
            .expect_type("additionalOptions.systemPrompt", ValueType::String)
            .expect_type("additionalOptions.projectPath", ValueType::String)
            .expect_type("additionalOptions.requirePermissions", ValueType::Boolean)
            .expect_type("additionalOptions.debug", ValueType::Boolean)
            .expect_range("maxTurns", MAX_TURNS_RANGE)
            .expect_range("timeout", TIMEOUT_SECS_RANGE)
            .expect_pattern("allowedTools", TOOL_TOKEN_PATTERN)?
            .custom("model", |v| match v.as_str() {
                Some(s) => s.parse::<ModelFamily>().map(|_| ()),
                None => Ok(()),
            }))
    }

    pub fn expect_type(mut self, key: impl Into<String>, value_type: ValueType) -> Self {
        self.type_rules.insert(key.into(), value_type);
        self
    }

    pub fn expect_range(mut self, key: impl Into<String>, range: RangeInclusive<i64>) -> Self {
        self.range_rules.insert(key.into(), range);
        self
    }

    /// Pattern for a string value, or for every string in an array value.
    pub fn expect_pattern(mut self, key: impl Into<String>, pattern: &str) -> ConfigResult<Self> {
        let key = key.into();
        let regex = regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
            key: key.clone(),
            message: format!("Invalid regex pattern: {}", e),
        })?;
        self.pattern_rules.insert(key, regex);
        Ok(self)
    }

    pub fn custom<F>(mut self, key: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.custom_rules.insert(key.into(), Box::new(validator));
        self
    }

    pub fn validate(&self, config: &Value) -> ConfigResult<()> {
        let errors = self.collect_errors(config);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationErrors(ValidationErrors(errors)))
        }
    }

    fn collect_errors(&self, config: &Value) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (key, expected_type) in &self.type_rules {
            if let Some(value) = get_nested(config, key)
                && !value.is_null()
                && !expected_type.matches(value)
            {
                errors.push(ConfigError::InvalidValue {
                    key: key.clone(),
                    message: format!(
                        "expected {}, got {}",
                        expected_type.name(),
                        value_type_name(value)
                    ),
                });
            }
        }

        for (key, range) in &self.range_rules {
            let Some(value) = get_nested(config, key).filter(|v| v.is_number()) else {
                continue;
            };
            match value.as_i64() {
                Some(num) if range.contains(&num) => {}
                Some(num) => errors.push(ConfigError::InvalidValue {
                    key: key.clone(),
                    message: format!(
                        "value {} not in range {}..={}",
                        num,
                        range.start(),
                        range.end()
                    ),
                }),
                None => errors.push(ConfigError::InvalidValue {
                    key: key.clone(),
                    message: format!("expected an integer, got {}", value),
                }),
            }
        }

        for (key, pattern) in &self.pattern_rules {
            let Some(value) = get_nested(config, key) else {
                continue;
            };
            let candidates: Vec<&Value> = match value {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            for candidate in candidates {
                match candidate.as_str() {
                    Some(s) if pattern.is_match(s) => {}
                    Some(s) => errors.push(ConfigError::InvalidValue {
                        key: key.clone(),
                        message: format!("Value '{}' does not match pattern", s),
                    }),
                    None if value.is_array() => errors.push(ConfigError::InvalidValue {
                        key: key.clone(),
                        message: format!(
                            "expected string entries, got {}",
                            value_type_name(candidate)
                        ),
                    }),
                    None => {}
                }
            }
        }

        for (key, validator) in &self.custom_rules {
            if let Some(value) = get_nested(config, key)
                && let Err(msg) = validator(value)
            {
                errors.push(ConfigError::InvalidValue {
                    key: key.clone(),
                    message: msg,
                });
            }
        }

        errors
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn get_nested<'a>(config: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = config;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_config_accepts_empty_object() {
        let validator = ConfigValidator::tool_config().unwrap();
        assert!(validator.validate(&json!({})).is_ok());
    }

    #[test]
    fn test_tool_config_accepts_full_parameters() {
        let validator = ConfigValidator::tool_config().unwrap();
        let config = json!({
            "name": "claude-code",
            "description": "Coding agent",
            "model": "opus",
            "maxTurns": 100,
            "timeout": 30,
            "allowedTools": ["Bash", "exit_plan_mode"],
            "additionalOptions": {
                "systemPrompt": "Be terse",
                "projectPath": "/tmp",
                "requirePermissions": true,
                "debug": false
            }
        });
        assert!(validator.validate(&config).is_ok());
    }

    #[test]
    fn test_range_validation() {
        let validator = ConfigValidator::tool_config().unwrap();

        assert!(validator.validate(&json!({"maxTurns": 0})).is_err());
        assert!(validator.validate(&json!({"maxTurns": 101})).is_err());
        assert!(validator.validate(&json!({"timeout": 29})).is_err());
        assert!(validator.validate(&json!({"timeout": 601})).is_err());
        assert!(validator.validate(&json!({"timeout": 45.5})).is_err());
    }

    #[test]
    fn test_type_validation() {
        let validator = ConfigValidator::tool_config().unwrap();
        let err = validator
            .validate(&json!({
                "maxTurns": "50",
                "additionalOptions": { "debug": "yes" }
            }))
            .unwrap_err();

        match err {
            ConfigError::ValidationErrors(errors) => assert_eq!(errors.0.len(), 2),
            other => panic!("Expected aggregated errors, got {:?}", other),
        }
    }

    #[test]
    fn test_pattern_validation_on_array() {
        let validator = ConfigValidator::tool_config().unwrap();
        assert!(
            validator
                .validate(&json!({"allowedTools": ["Read", "rm -rf"]}))
                .is_err()
        );
        assert!(validator.validate(&json!({"allowedTools": [1]})).is_err());
    }

    #[test]
    fn test_model_validation() {
        let validator = ConfigValidator::tool_config().unwrap();
        assert!(validator.validate(&json!({"model": "sonnet"})).is_ok());
        assert!(validator.validate(&json!({"model": "opus"})).is_ok());
        let err = validator.validate(&json!({"model": "haiku"})).unwrap_err();
        assert!(err.to_string().contains("haiku"));
    }

    #[test]
    fn test_model_rule_matches_model_parser() {
        let validator = ConfigValidator::tool_config().unwrap();
        for name in ["sonnet", "opus", "fast", "capable", "Opus", ""] {
            assert_eq!(
                validator.validate(&json!({ "model": name })).is_ok(),
                name.parse::<ModelFamily>().is_ok(),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(ConfigValidator::new().expect_pattern("name", "(").is_err());
    }
}
