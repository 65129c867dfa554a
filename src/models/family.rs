use serde::{Deserialize, Serialize};

/// Model selector passed to the agent session.
///
/// Only two families are offered to tool callers: a fast default and a
/// more capable option for complex tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    #[default]
    Sonnet,
    Opus,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 2] = [ModelFamily::Sonnet, ModelFamily::Opus];

    /// Selector understood by the `claude` CLI `--model` flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sonnet => "sonnet",
            Self::Opus => "opus",
        }
    }

}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| format!("unknown model '{}', expected sonnet or opus", s))
    }
}
