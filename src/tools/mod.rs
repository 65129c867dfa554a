//! Capability tokens and the tool definition exposed to callers.

mod access;
mod builtin;
mod definition;

pub use access::{AllowedTools, DEFAULT_ALLOWED_TOOLS};
pub use builtin::BuiltinTool;
pub use definition::{TaskInput, ToolDefinition};
