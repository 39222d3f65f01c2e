//! Sends a prompt to a chat session under a deadline.

use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::debug;

use crate::domain::errors::DispatchError;
use crate::domain::models::Reply;
use crate::domain::ports::ChatSession;

/// Default wall-clock limit for a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Dispatches prompts with a hard timeout. Never retries.
#[derive(Debug, Clone, Copy)]
pub struct RequestDispatcher {
    timeout: Duration,
}

impl Default for RequestDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl RequestDispatcher {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `prompt` and return the reply with its latency.
    ///
    /// When the deadline passes the in-flight request is dropped and
    /// `DispatchError::Timeout` is returned.
    pub async fn dispatch<C>(&self, session: &mut C, prompt: &str) -> Result<Reply, DispatchError>
    where
        C: ChatSession + ?Sized,
    {
        let started = Instant::now();
        let text = timeout(self.timeout, session.ask(prompt))
            .await
            .map_err(|_| DispatchError::Timeout(self.timeout))??;
        let elapsed = started.elapsed();

        debug!(
            backend = session.name(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "dispatch complete"
        );
        Ok(Reply { text, elapsed })
    }
}
