//! Allowed-tool set forwarded to the agent session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::BuiltinTool;

/// Tokens the default configuration allows.
///
/// `exit_plan_mode` is not part of the [`BuiltinTool`] catalog; it is
/// forwarded as-is like any other token.
pub const DEFAULT_ALLOWED_TOOLS: &[&str] =
    &["WebFetch", "TodoWrite", "WebSearch", "exit_plan_mode", "Task"];

/// Unordered, duplicate-free set of tool tokens the session may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedTools(BTreeSet<String>);

impl AllowedTools {
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn only(tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(tools.into_iter().map(Into::into).collect())
    }

    pub fn builtin(tools: impl IntoIterator<Item = BuiltinTool>) -> Self {
        Self(tools.into_iter().map(|t| t.name().to_string()).collect())
    }

    #[inline]
    pub fn is_allowed(&self, tool_name: &str) -> bool {
        self.0.contains(tool_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tokens that are not in the built-in catalog.
    pub fn unknown(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|name| BuiltinTool::from_name(name).is_none())
    }

    /// Sorted, separator-joined token list.
    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }
}

impl Default for AllowedTools {
    fn default() -> Self {
        Self::only(DEFAULT_ALLOWED_TOOLS.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedTools {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::only(iter)
    }
}
