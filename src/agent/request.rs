//! Request construction for a single invocation.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ToolConfig;
use crate::models::ModelFamily;
use crate::permissions::PermissionMode;
use crate::tools::AllowedTools;

/// Fully resolved parameters for one agent session run.
///
/// Owned by exactly one invocation. `cancel` is cancelled when the
/// deadline elapses; clones share the same token.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub prompt: String,
    pub max_turns: u32,
    pub permission_mode: PermissionMode,
    pub model: ModelFamily,
    pub allowed_tools: AllowedTools,
    pub system_prompt: Option<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

// Token identity is excluded.
impl PartialEq for RequestDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.prompt == other.prompt
            && self.max_turns == other.max_turns
            && self.permission_mode == other.permission_mode
            && self.model == other.model
            && self.allowed_tools == other.allowed_tools
            && self.system_prompt == other.system_prompt
            && self.working_dir == other.working_dir
            && self.timeout == other.timeout
    }
}

impl Eq for RequestDescriptor {}

/// Maps a validated [`ToolConfig`] and an input string to a
/// [`RequestDescriptor`]. Never fails and never re-validates.
pub struct InvocationBuilder<'a> {
    config: &'a ToolConfig,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(config: &'a ToolConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, input: &str) -> RequestDescriptor {
        let options = &self.config.additional_options;
        RequestDescriptor {
            prompt: input.to_string(),
            max_turns: self.config.max_turns,
            permission_mode: PermissionMode::from_require_permissions(options.require_permissions),
            model: self.config.model,
            allowed_tools: self.config.allowed_tools.clone(),
            system_prompt: self.config.system_prompt().map(String::from),
            working_dir: resolve_working_dir(self.config.project_path()),
            timeout: self.config.timeout(),
            cancel: CancellationToken::new(),
        }
    }
}

fn resolve_working_dir(project_path: Option<&str>) -> PathBuf {
    match project_path {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to resolve current directory, using '.'");
            PathBuf::from(".")
        }),
    }
}
