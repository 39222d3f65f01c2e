//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces adapters implement:
//! - ChatSession: a conversation with the chat service
//! - ArtifactStore: persistence of parsed and failed replies
//!
//! The control loop depends only on these traits.

pub mod artifact_store;
pub mod chat_session;

pub use artifact_store::ArtifactStore;
pub use chat_session::ChatSession;
