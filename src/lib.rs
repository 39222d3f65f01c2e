//! quiz-harvester - harvest quiz questions from a chat model
//!
//! Walks a topic taxonomy (categories → subcategories), asks a chat model for
//! questions on each subcategory, and stores every parsed reply as a JSON file
//! under `results/<category>/<subcategory>/`.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, and the chat/storage ports
//! - **Service Layer** (`services`): input loading, dispatch, parsing, and the control loop
//! - **Adapters** (`adapters`): OpenAI-compatible chat session, filesystem store, mock session
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use adapters::chat::{MockChatSession, MockReply, OpenAiChatConfig, OpenAiChatSession};
pub use adapters::storage::FsArtifactStore;
pub use domain::errors::{ChatError, DispatchError, InputError, ParseError, StoreError};
pub use domain::models::{
    CallOutcome, Config, ParseStrategy, PromptState, RunSummary, SubcategoryReport, Taxonomy,
};
pub use domain::ports::{ArtifactStore, ChatSession};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{LogConfig, RunLogger};
pub use services::{HarvestLoop, HarvestSettings, PromptTemplates, ResponseParser};
