//! Domain errors for the quiz harvester.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a chat session.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The service is temporarily unreachable; callers back off before retrying.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ChatError {
    /// Returns true if the failure means "come back later" rather than "broken request".
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }
}

/// Errors from a single dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Timeout reached after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// A reply that could not be turned into a payload.
///
/// Bad JSON, a missing field, and too few items all land here; the reason is
/// for logs only.
#[derive(Debug, Error)]
#[error("invalid format: {reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors while persisting an artifact.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while loading templates, topics, or adjectives.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid topics file {path}: {source}")]
    Taxonomy {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid template {path}: {reason}")]
    Template { path: PathBuf, reason: String },
}
