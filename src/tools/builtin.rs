//! Catalog of built-in capability tokens the agent session understands.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuiltinTool {
    Bash,
    Edit,
    MultiEdit,
    Read,
    Task,
    TodoWrite,
    WebFetch,
    WebSearch,
    Write,
}

impl BuiltinTool {
    pub const ALL: [BuiltinTool; 9] = [
        BuiltinTool::Bash,
        BuiltinTool::Edit,
        BuiltinTool::MultiEdit,
        BuiltinTool::Read,
        BuiltinTool::Task,
        BuiltinTool::TodoWrite,
        BuiltinTool::WebFetch,
        BuiltinTool::WebSearch,
        BuiltinTool::Write,
    ];

    /// Token passed to the session's allowed-tools list.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "Bash",
            Self::Edit => "Edit",
            Self::MultiEdit => "MultiEdit",
            Self::Read => "Read",
            Self::Task => "Task",
            Self::TodoWrite => "TodoWrite",
            Self::WebFetch => "WebFetch",
            Self::WebSearch => "WebSearch",
            Self::Write => "Write",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }
}

impl std::fmt::Display for BuiltinTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(BuiltinTool::from_name("Bash"), Some(BuiltinTool::Bash));
        assert_eq!(
            BuiltinTool::from_name("TodoWrite"),
            Some(BuiltinTool::TodoWrite)
        );
        assert_eq!(BuiltinTool::from_name("bash"), None);
        assert_eq!(BuiltinTool::from_name("exit_plan_mode"), None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = BuiltinTool::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BuiltinTool::ALL.len());
    }
}
