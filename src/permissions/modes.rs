//! Permission modes forwarded to the agent session.

use serde::{Deserialize, Serialize};

/// Permission mode that determines how the agent session treats tool use.
///
/// # Modes
///
/// - **Default**: the session asks for confirmation before using tools.
///
/// - **BypassPermissions**: every allowed tool runs without confirmation.
///   This is what unattended tool calls use unless the caller asks for
///   permissions to be required.
///
/// # Example
///
/// ```rust
/// use claude_code_tool::permissions::PermissionMode;
///
/// assert_eq!(PermissionMode::from_require_permissions(false), PermissionMode::BypassPermissions);
/// assert_eq!(PermissionMode::from_require_permissions(true), PermissionMode::Default);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionMode {
    /// Interactive confirmation for tool use.
    #[default]
    Default,

    /// Auto-approve every allowed tool.
    BypassPermissions,
}

impl PermissionMode {
    pub fn from_require_permissions(require_permissions: bool) -> Self {
        if require_permissions {
            PermissionMode::Default
        } else {
            PermissionMode::BypassPermissions
        }
    }
}

impl std::fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionMode::Default => write!(f, "default"),
            PermissionMode::BypassPermissions => write!(f, "bypassPermissions"),
        }
    }
}
