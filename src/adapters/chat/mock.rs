//! Mock chat session for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::errors::ChatError;
use crate::domain::ports::ChatSession;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply with this text.
    Text(String),
    /// Fail with `ChatError::Request`.
    Error(String),
    /// Fail with `ChatError::ServiceUnavailable`.
    Unavailable,
    /// Never complete; only a deadline gets the caller out.
    Hang,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

/// What the mock observed; shared so tests can inspect it after the session moves.
#[derive(Debug, Default)]
pub struct MockLog {
    pub prompts: Vec<String>,
    pub new_conversations: usize,
}

/// Chat session that replays a fixed script.
///
/// Every `ask` pops the next scripted reply; once the script is empty the
/// fallback reply is used.
pub struct MockChatSession {
    script: VecDeque<MockReply>,
    fallback: MockReply,
    log: Arc<Mutex<MockLog>>,
}

impl MockChatSession {
    pub fn new(script: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: MockReply::error("mock script exhausted"),
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    /// Reply used once the script runs out.
    #[must_use]
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Handle to the observation log.
    pub fn log(&self) -> Arc<Mutex<MockLog>> {
        Arc::clone(&self.log)
    }

    fn lock(&self) -> MutexGuard<'_, MockLog> {
        self.log
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ChatSession for MockChatSession {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn new_conversation(&mut self) -> Result<(), ChatError> {
        self.lock().new_conversations += 1;
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> Result<String, ChatError> {
        self.lock().prompts.push(prompt.to_string());
        let reply = self
            .script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(ChatError::Request(message)),
            MockReply::Unavailable => Err(ChatError::ServiceUnavailable("mock".to_string())),
            MockReply::Hang => std::future::pending().await,
        }
    }
}
