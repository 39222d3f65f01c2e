//! Chat session implementations.

pub mod mock;
pub mod openai_api;

pub use mock::{MockChatSession, MockReply};
pub use openai_api::{ChatMessage, MessageRole, OpenAiChatConfig, OpenAiChatSession};
