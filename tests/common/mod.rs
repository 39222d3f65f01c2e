//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use quiz_harvester::domain::errors::StoreError;
use quiz_harvester::domain::models::{Category, ParseStrategy, PromptTemplate, Taxonomy};
use quiz_harvester::domain::ports::ArtifactStore;
use quiz_harvester::services::{HarvestSettings, PromptTemplates, WaitPolicy};

pub const SENTINEL: &str = "Unusable response produced by ChatGPT, maybe its unavailable.";

pub const TIMEOUT: Duration = Duration::from_secs(30);
pub const WAIT_SUCCESS: Duration = Duration::from_secs(5);
pub const WAIT_ERROR: Duration = Duration::from_secs(120);
pub const WAIT_BLOCK: Duration = Duration::from_secs(600);
pub const WAIT_PARSE: Duration = Duration::from_secs(0);

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Loop settings with short, distinct waits.
pub fn settings(strategy: ParseStrategy, calls: u32, attempts: u32, questions: u32) -> HarvestSettings {
    HarvestSettings {
        calls,
        attempts,
        questions,
        ranks: 6,
        timeout: TIMEOUT,
        strategy,
        waits: WaitPolicy {
            success: WAIT_SUCCESS,
            error: WAIT_ERROR,
            block: WAIT_BLOCK,
            parse: WAIT_PARSE,
        },
        unavailable_message: SENTINEL.to_string(),
        skip_categories: Vec::new(),
    }
}

/// Base template `BASE ...` and continuation template `MORE ...`.
pub fn templates() -> PromptTemplates {
    PromptTemplates {
        base: PromptTemplate::parse("BASE {questions} questions about {category}/{sub_category}, call {call} of {calls}")
            .expect("base template"),
        continuation: Some(PromptTemplate::parse("MORE {sub_category}").expect("continuation template")),
    }
}

/// Parse a taxonomy from topics-file JSON.
pub fn taxonomy(json: &str) -> Taxonomy {
    Taxonomy::from_json(json).expect("taxonomy json")
}

/// One category with one subcategory.
pub fn single_topic(category: &str, subcategory: &str) -> Taxonomy {
    Taxonomy {
        categories: vec![Category {
            name: category.to_string(),
            subcategories: vec![subcategory.to_string()],
        }],
    }
}

/// Every `.json` file under `dir`, recursively, sorted.
pub fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

/// Artifact store that rejects every write.
/// Clones share the attempt counter.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    pub attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl ArtifactStore for FailingStore {
    async fn save(&self, dir: &Path, filename: &str, _payload: &str) -> Result<PathBuf, StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Write {
            path: dir.join(format!("{filename}.json")),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}
