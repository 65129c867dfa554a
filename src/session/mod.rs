//! External agent sessions and the events they emit.

mod cli;
mod events;
mod scripted;
mod traits;

pub use cli::{CliSession, DEFAULT_MAX_LINE_BYTES, DEFAULT_PROGRAM};
pub use events::{ContentFragment, SessionEvent};
pub use scripted::{ScriptStep, ScriptedSession};
pub use traits::{AgentSession, EventStream};
