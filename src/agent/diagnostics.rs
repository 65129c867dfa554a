//! Optional diagnostic side channel for debug-mode invocations.

use std::sync::Mutex;

/// Receives one line per diagnostic. Write-only; nothing reads it back
/// during an invocation.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Forwards lines to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::debug!(target: "claude_code_tool::diagnostics", "{}", line);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn emit(&self, _line: &str) {}
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        sink.emit("one");
        sink.emit("two");
        assert_eq!(sink.lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn DiagnosticSink>> = vec![Box::new(TracingSink), Box::new(NoopSink)];
        for sink in &sinks {
            sink.emit("ignored");
        }
    }
}
