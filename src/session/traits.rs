//! Agent session trait definitions.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::SessionEvent;
use crate::agent::RequestDescriptor;

/// Lazy, non-restartable sequence of session events.
///
/// `None` means the session closed normally. An `Err` item is terminal.
pub type EventStream = Pin<Box<dyn Stream<Item = crate::Result<SessionEvent>> + Send>>;

/// An external agent session that can run one request.
///
/// Implementations must stop producing events once `request.cancel` is
/// cancelled, though not necessarily immediately.
#[async_trait]
pub trait AgentSession: Send + Sync {
    /// Session name for logging.
    fn name(&self) -> &str;

    async fn start(&self, request: &RequestDescriptor) -> crate::Result<EventStream>;
}
