//! Scripted session for tests and offline hosts.

use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, stream};
use tokio::sync::Mutex;

use super::{AgentSession, EventStream, SessionEvent};
use crate::agent::RequestDescriptor;

#[derive(Debug, Clone)]
pub enum ScriptStep {
    Event(SessionEvent),
    Fail(String),
}

/// Replays a fixed sequence of events and failures.
///
/// Every started request is recorded, so callers can inspect what the
/// adapter asked for.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    steps: Vec<ScriptStep>,
    hang: bool,
    start_error: Option<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedSession {
    pub fn new(events: impl IntoIterator<Item = SessionEvent>) -> Self {
        Self {
            steps: events.into_iter().map(ScriptStep::Event).collect(),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Session whose `start` fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            start_error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn then_event(mut self, event: SessionEvent) -> Self {
        self.steps.push(ScriptStep::Event(event));
        self
    }

    pub fn then_fail(mut self, message: impl Into<String>) -> Self {
        self.steps.push(ScriptStep::Fail(message.into()));
        self
    }

    /// Keep the stream open after the script instead of closing it.
    pub fn then_hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Pause before each scripted step.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl AgentSession for ScriptedSession {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start(&self, request: &RequestDescriptor) -> crate::Result<EventStream> {
        self.requests.lock().await.push(request.clone());

        if let Some(message) = &self.start_error {
            return Err(crate::Error::Session(message.clone()));
        }

        let delay = self.delay;
        let scripted = stream::iter(self.steps.clone()).then(move |step| async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match step {
                ScriptStep::Event(event) => Ok(event),
                ScriptStep::Fail(message) => Err(crate::Error::Session(message)),
            }
        });

        let events: EventStream = if self.hang {
            Box::pin(scripted.chain(stream::pending()))
        } else {
            Box::pin(scripted)
        };

        Ok(Box::pin(
            events.take_until(request.cancel.clone().cancelled_owned()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::InvocationBuilder;
    use crate::config::ToolConfig;

    fn request() -> RequestDescriptor {
        InvocationBuilder::new(&ToolConfig::default().with_project_path("/tmp")).build("task")
    }

    #[tokio::test]
    async fn test_replays_script() {
        let session = ScriptedSession::new([SessionEvent::other("system")])
            .then_event(SessionEvent::result("ok"))
            .then_fail("boom");

        let items: Vec<_> = session.start(&request()).await.unwrap().collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].as_ref().unwrap(), &SessionEvent::result("ok"));
        assert!(items[2].is_err());
        assert_eq!(session.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_start() {
        let session = ScriptedSession::failing("spawn failed");
        let err = session.start(&request()).await.err().unwrap();
        assert!(err.to_string().contains("spawn failed"));
    }

    #[tokio::test]
    async fn test_stops_on_cancel() {
        let session = ScriptedSession::new([SessionEvent::other("system")]).then_hang();
        let request = request();
        let mut events = session.start(&request).await.unwrap();

        assert!(events.next().await.is_some());
        request.cancel.cancel();
        assert!(events.next().await.is_none());
    }
}
