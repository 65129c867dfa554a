//! Typed tool parameters.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigResult, ConfigValidator};
use crate::models::ModelFamily;
use crate::tools::AllowedTools;

pub const DEFAULT_NAME: &str = "claude-code";
pub const DEFAULT_DESCRIPTION: &str = "Execute AI-powered coding tasks using Claude Code SDK. \
    Can analyze code, fix bugs, write new features, and perform various development tasks.";
pub const DEFAULT_MAX_TURNS: u32 = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Parameters for one configured tool instance.
///
/// Keys match the host's parameter names, so a parameter object can be
/// deserialized directly. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolConfig {
    /// Name the calling agent sees.
    pub name: String,
    /// Description the calling agent sees.
    pub description: String,
    pub model: ModelFamily,
    pub max_turns: u32,
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
    pub allowed_tools: AllowedTools,
    pub additional_options: AdditionalOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalOptions {
    pub system_prompt: Option<String>,
    /// Working directory for the session; the process cwd when unset.
    pub project_path: Option<String>,
    pub require_permissions: bool,
    pub debug: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            model: ModelFamily::default(),
            max_turns: DEFAULT_MAX_TURNS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            allowed_tools: AllowedTools::default(),
            additional_options: AdditionalOptions::default(),
        }
    }
}

impl ToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw parameter object, then deserialize it.
    pub fn from_value(value: serde_json::Value) -> ConfigResult<Self> {
        ConfigValidator::tool_config()?.validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "Loaded tool config");
        Ok(config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_model(mut self, model: ModelFamily) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_allowed_tools(mut self, tools: AllowedTools) -> Self {
        self.allowed_tools = tools;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.additional_options.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_project_path(mut self, path: impl Into<String>) -> Self {
        self.additional_options.project_path = Some(path.into());
        self
    }

    pub fn require_permissions(mut self, require: bool) -> Self {
        self.additional_options.require_permissions = require;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.additional_options.debug = debug;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// System prompt, treating an empty string as unset.
    pub fn system_prompt(&self) -> Option<&str> {
        self.additional_options
            .system_prompt
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    /// Project path, treating an empty string as unset.
    pub fn project_path(&self) -> Option<&str> {
        self.additional_options
            .project_path
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}
