//! # claude-code-tool
//!
//! Exposes a Claude Code agent session as a single tool for agent
//! orchestration: one instruction string in, one result string out.
//!
//! The session runs under a turn budget, a permission mode and a wall-clock
//! deadline. Whatever it does (finishes, times out, crashes), the tool
//! answers with text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claude_code_tool::{ClaudeCodeTool, ModelFamily, ToolConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ToolConfig::default()
//!         .with_model(ModelFamily::Opus)
//!         .with_timeout_secs(120)
//!         .with_project_path("./project");
//!
//!     let tool = ClaudeCodeTool::new(config);
//!     let answer = tool.execute("Fix the failing test in src/parser.rs").await;
//!     println!("{}", answer);
//! }
//! ```
//!
//! ## Custom Sessions
//!
//! Any [`AgentSession`] can back the tool. [`ScriptedSession`] replays a fixed
//! event sequence:
//!
//! ```rust
//! use std::sync::Arc;
//! use claude_code_tool::{ClaudeCodeTool, ScriptedSession, SessionEvent, ToolConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = ScriptedSession::new([SessionEvent::result("All tests pass")]);
//! let tool = ClaudeCodeTool::with_session(ToolConfig::default(), Arc::new(session));
//! assert_eq!(tool.execute("run the tests").await, "All tests pass");
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent;
pub mod config;
pub mod models;
pub mod permissions;
pub mod session;
pub mod tools;

pub use agent::{
    ClaudeCodeTool, DiagnosticSink, InvocationBuilder, InvocationState, MemorySink,
    NO_OUTPUT_SENTINEL, NoopSink, RequestDescriptor, TracingSink, reduce,
};
pub use config::{AdditionalOptions, ConfigError, ConfigValidator, ToolConfig};
pub use models::ModelFamily;
pub use permissions::PermissionMode;
pub use session::{
    AgentSession, CliSession, ContentFragment, EventStream, ScriptedSession, SessionEvent,
};
pub use tools::{AllowedTools, BuiltinTool, TaskInput, ToolDefinition};

/// Error type for claude-code-tool operations.
///
/// These never cross [`ClaudeCodeTool::execute`]; they are rendered into the
/// returned string there.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session process could not be started or exited abnormally.
    #[error("Process error: {0}")]
    Process(String),

    /// Session emitted a payload that could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Session transport broke while reading events.
    #[error("Stream error: {0}")]
    Stream(String),

    /// Session raised a failure of its own.
    #[error("Session error: {0}")]
    Session(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Io(e),
            other => Error::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
