//! Agent task execution: request building, stream consumption and reduction.

mod deadline;
mod diagnostics;
mod executor;
mod reducer;
mod request;
mod state;

pub use deadline::DeadlineTimer;
pub use diagnostics::{DiagnosticSink, MemorySink, NoopSink, TracingSink};
pub use executor::ClaudeCodeTool;
pub use reducer::{NO_OUTPUT_SENTINEL, TASK_LABEL, error_text, outcome_text, reduce};
pub use request::{InvocationBuilder, RequestDescriptor};
pub use state::InvocationState;
