//! Chat session port - interface for the conversational backend.

use async_trait::async_trait;

use crate::domain::errors::ChatError;

/// A stateful conversation with a chat service.
///
/// Implementations keep whatever context the service needs between `ask`
/// calls; `new_conversation` discards it.
#[async_trait]
pub trait ChatSession: Send {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Drop the current conversation and start an empty one.
    async fn new_conversation(&mut self) -> Result<(), ChatError>;

    /// Send a prompt within the current conversation and return the reply text.
    ///
    /// The returned future may be dropped before completion (for example on
    /// timeout); implementations must leave the conversation usable.
    async fn ask(&mut self, prompt: &str) -> Result<String, ChatError>;
}
