//! The tool boundary: one input string in, one result string out.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{Instrument, debug, trace, warn};

use super::deadline::DeadlineTimer;
use super::diagnostics::{DiagnosticSink, TracingSink};
use super::reducer::{error_text, reduce};
use super::request::{InvocationBuilder, RequestDescriptor};
use super::state::InvocationState;
use crate::config::ToolConfig;
use crate::session::{AgentSession, CliSession, SessionEvent};
use crate::tools::{TaskInput, ToolDefinition};

const INPUT_PREVIEW_CHARS: usize = 100;

/// Exposes an agent session as a tool that always answers with a string.
///
/// Each call to [`execute`](Self::execute) owns its own request, event
/// buffer and deadline; concurrent calls share nothing mutable.
#[derive(Clone)]
pub struct ClaudeCodeTool {
    config: Arc<ToolConfig>,
    session: Arc<dyn AgentSession>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

struct Consumed {
    events: Vec<SessionEvent>,
    state: InvocationState,
}

impl ClaudeCodeTool {
    /// Tool backed by the `claude` CLI.
    pub fn new(config: ToolConfig) -> Self {
        Self::with_session(config, Arc::new(CliSession::new()))
    }

    pub fn with_session(config: ToolConfig, session: Arc<dyn AgentSession>) -> Self {
        Self {
            config: Arc::new(config),
            session,
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Tool built from a raw host parameter object, validated first.
    pub fn from_parameters(parameters: serde_json::Value) -> crate::Result<Self> {
        Ok(Self::new(ToolConfig::from_value(parameters)?))
    }

    /// Replace the sink that receives debug-mode diagnostics.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.config.description
    }

    #[must_use]
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::for_task(&self.config.name, &self.config.description)
    }

    /// Run the tool on a host payload (bare string or `{"input": ...}`).
    pub async fn call(&self, payload: serde_json::Value) -> String {
        let input = TaskInput::from_payload(payload);
        self.execute(&input.input).await
    }

    /// Run one invocation. Never fails: session errors come back as
    /// `"Error executing Claude Code: ..."`.
    pub async fn execute(&self, input: &str) -> String {
        let invocation_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "claude_code.execute",
            %invocation_id,
            tool = %self.config.name,
            model = %self.config.model,
            max_turns = self.config.max_turns,
        );
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: &str) -> String {
        let mut state = InvocationState::Building;
        let request = InvocationBuilder::new(&self.config).build(input);
        self.log_request(&request);

        transition(&mut state, InvocationState::Streaming);
        let result = match self.consume(&request).await {
            Ok(consumed) => {
                transition(&mut state, consumed.state);
                self.diagnostic(|| {
                    format!("Execution completed. Messages: {}", consumed.events.len())
                });
                let text = reduce(&consumed.events);
                debug!(
                    events = consumed.events.len(),
                    state = %consumed.state,
                    "Reduced session events"
                );
                text
            }
            Err(e) => {
                transition(&mut state, InvocationState::Failed);
                warn!(session = self.session.name(), error = %e, "Agent session failed");
                self.diagnostic(|| format!("Error: {}", e));
                error_text(&e)
            }
        };
        transition(&mut state, InvocationState::Reduced);
        transition(&mut state, InvocationState::Done);
        result
    }

    async fn consume(&self, request: &RequestDescriptor) -> crate::Result<Consumed> {
        let cancel = &request.cancel;
        let timer = DeadlineTimer::arm(cancel.clone(), request.timeout);
        let mut events = Vec::new();

        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(self.timed_out(request, events)),
            stream = self.session.start(request) => stream?,
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(self.timed_out(request, events)),
                next = stream.next() => next,
            };

            match next {
                Some(Ok(event)) => {
                    self.diagnostic(|| format!("Received message type: {}", event.kind()));
                    trace!(kind = event.kind(), index = events.len(), "Session event");
                    events.push(event);
                }
                Some(Err(e)) => return Err(e),
                None => {
                    timer.disarm();
                    return Ok(Consumed {
                        events,
                        state: InvocationState::Completed,
                    });
                }
            }
        }
    }

    fn timed_out(&self, request: &RequestDescriptor, events: Vec<SessionEvent>) -> Consumed {
        warn!(
            timeout_secs = request.timeout.as_secs(),
            buffered = events.len(),
            "Agent session timed out, reducing partial output"
        );
        Consumed {
            events,
            state: InvocationState::TimedOut,
        }
    }

    fn log_request(&self, request: &RequestDescriptor) {
        debug!(
            cwd = %request.working_dir.display(),
            permission_mode = %request.permission_mode,
            timeout_secs = request.timeout.as_secs(),
            "Starting agent session"
        );
        let unknown: Vec<&str> = request.allowed_tools.unknown().collect();
        if !unknown.is_empty() {
            debug!(tools = ?unknown, "Forwarding tools outside the built-in catalog");
        }
        self.diagnostic(|| {
            let preview: String = request.prompt.chars().take(INPUT_PREVIEW_CHARS).collect();
            format!("Received input: {}...", preview)
        });
        self.diagnostic(|| format!("Model: {}", request.model));
        self.diagnostic(|| format!("Max turns: {}", request.max_turns));
        self.diagnostic(|| format!("Allowed tools: {}", request.allowed_tools.join(", ")));
        self.diagnostic(|| format!("Working directory: {}", request.working_dir.display()));
    }

    fn diagnostic(&self, line: impl FnOnce() -> String) {
        if self.config.additional_options.debug {
            self.diagnostics
                .emit(&format!("[{}] {}", self.config.name, line()));
        }
    }
}

fn transition(state: &mut InvocationState, next: InvocationState) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid invocation transition {} -> {}",
        state,
        next
    );
    trace!(from = %state, to = %next, "Invocation state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::diagnostics::MemorySink;
    use crate::agent::reducer::NO_OUTPUT_SENTINEL;
    use crate::session::ScriptedSession;
    use std::time::Duration;

    fn config() -> ToolConfig {
        ToolConfig::default()
            .with_project_path("/tmp")
            .with_timeout_secs(30)
    }

    fn tool(session: ScriptedSession) -> (ClaudeCodeTool, Arc<ScriptedSession>) {
        let session = Arc::new(session);
        (
            ClaudeCodeTool::with_session(config(), session.clone()),
            session,
        )
    }

    #[tokio::test]
    async fn test_result_event() {
        let (tool, _) = tool(ScriptedSession::new([
            SessionEvent::other("system"),
            SessionEvent::result("X"),
        ]));
        assert_eq!(tool.execute("task").await, "X");
    }

    #[tokio::test]
    async fn test_empty_stream_returns_sentinel() {
        let (tool, _) = tool(ScriptedSession::empty());
        assert_eq!(tool.execute("task").await, NO_OUTPUT_SENTINEL);
    }

    #[tokio::test]
    async fn test_start_failure_is_formatted() {
        let (tool, _) = tool(ScriptedSession::failing("spawn ENOENT"));
        let out = tool.execute("task").await;
        assert!(out.starts_with("Error executing"));
        assert!(out.contains("spawn ENOENT"));
    }

    #[tokio::test]
    async fn test_mid_stream_failure_discards_buffer() {
        let (tool, _) = tool(
            ScriptedSession::new([SessionEvent::assistant_text("partial")])
                .then_fail("transport closed"),
        );
        let out = tool.execute("task").await;
        assert!(out.starts_with("Error executing Claude Code: "));
        assert!(out.contains("transport closed"));
        assert!(!out.contains("partial"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reduces_partial_output() {
        let (tool, session) = tool(
            ScriptedSession::new([SessionEvent::assistant_text("halfway there")])
                .then_hang(),
        );

        let started = tokio::time::Instant::now();
        let out = tool.execute("task").await;

        assert_eq!(out, "halfway there");
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert!(started.elapsed() < Duration::from_secs(31));
        assert!(session.requests().await[0].cancel.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_run_disarms_deadline() {
        let (tool, session) = tool(ScriptedSession::new([SessionEvent::result("done")]));
        assert_eq!(tool.execute("task").await, "done");

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!session.requests().await[0].cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_debug_diagnostics() {
        let sink = Arc::new(MemorySink::new());
        let session = Arc::new(ScriptedSession::new([
            SessionEvent::other("system"),
            SessionEvent::result("ok"),
        ]));
        let tool = ClaudeCodeTool::with_session(config().debug(true), session)
            .with_diagnostics(sink.clone());

        assert_eq!(tool.execute("refactor the parser").await, "ok");

        let lines = sink.lines();
        let has = |line: &str| lines.iter().any(|l| l == line);
        assert_eq!(lines[0], "[claude-code] Received input: refactor the parser...");
        assert!(has("[claude-code] Model: sonnet"));
        assert!(has("[claude-code] Received message type: system"));
        assert!(has("[claude-code] Received message type: result"));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("[claude-code] Execution completed. Messages: 2")
        );
    }

    #[tokio::test]
    async fn test_diagnostics_silent_without_debug() {
        let sink = Arc::new(MemorySink::new());
        let (tool, _) = tool(ScriptedSession::new([SessionEvent::result("ok")]));
        let tool = tool.with_diagnostics(sink.clone());

        assert_eq!(tool.execute("task").await, "ok");
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn test_call_accepts_object_payload() {
        let (tool, session) = tool(ScriptedSession::new([SessionEvent::result("ok")]));
        let out = tool.call(serde_json::json!({"input": "write docs"})).await;

        assert_eq!(out, "ok");
        assert_eq!(session.requests().await[0].prompt, "write docs");
    }

    #[test]
    fn test_definition_passes_identity_through() {
        let config = config().with_name("coder").with_description("Writes code");
        let tool = ClaudeCodeTool::with_session(config, Arc::new(ScriptedSession::empty()));
        let def = tool.definition();

        assert_eq!(def.name, "coder");
        assert_eq!(def.description, "Writes code");
        assert_eq!(tool.name(), "coder");
    }
}
