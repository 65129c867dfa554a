//! Wall-clock deadline bound to a cancellation token.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels a token once a timeout elapses unless disarmed first.
///
/// Dropping the timer disarms it.
pub struct DeadlineTimer {
    handle: Option<JoinHandle<()>>,
}

impl DeadlineTimer {
    pub fn arm(token: CancellationToken, timeout: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    tracing::debug!(
                        timeout_secs = timeout.as_secs(),
                        "Deadline elapsed, cancelling session"
                    );
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn disarm(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.abort();
    }
}
