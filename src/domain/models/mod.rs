//! Domain models.

pub mod config;
pub mod harvest;
pub mod prompt;
pub mod taxonomy;

pub use config::{ChatConfig, Config, HarvestConfig, InputConfig, LoggingConfig};
pub use harvest::{
    CallOutcome, ParseStrategy, ParsedResponse, PromptState, Reply, RunSummary,
    SubcategoryReport,
};
pub use prompt::{Placeholder, PromptParams, PromptTemplate, TemplateError};
pub use taxonomy::{Category, Taxonomy};
