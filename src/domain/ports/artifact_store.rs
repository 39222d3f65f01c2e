//! Artifact store port - where harvested payloads end up.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::errors::StoreError;

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `payload` to `<dir>/<filename>.json`, creating `dir` as needed.
    ///
    /// `dir` is relative to the store's root. Existing files are overwritten.
    /// Returns the path written.
    async fn save(&self, dir: &Path, filename: &str, payload: &str) -> Result<PathBuf, StoreError>;
}
