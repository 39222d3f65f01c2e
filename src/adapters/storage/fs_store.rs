//! Filesystem artifact store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::domain::ports::ArtifactStore;

/// Writes artifacts as `<root>/<dir>/<filename>.json`.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(&self, dir: &Path, filename: &str, payload: &str) -> Result<PathBuf, StoreError> {
        let save_dir = self.root.join(dir);
        fs::create_dir_all(&save_dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: save_dir.clone(),
                source,
            })?;

        let save_path = save_dir.join(format!("{filename}.json"));
        fs::write(&save_path, payload)
            .await
            .map_err(|source| StoreError::Write {
                path: save_path.clone(),
                source,
            })?;

        debug!(path = %save_path.display(), bytes = payload.len(), "artifact written");
        Ok(save_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_creates_missing_parents() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path().join("results"));
        assert_eq!(store.root(), temp_dir.path().join("results"));

        let path = store
            .save(Path::new("Science/Physics"), "gravity", r#"["What is gravity?"]"#)
            .await
            .unwrap();

        assert_eq!(path, temp_dir.path().join("results/Science/Physics/gravity.json"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, r#"["What is gravity?"]"#);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path());

        store.save(Path::new("a"), "same", "first").await.unwrap();
        let path = store.save(Path::new("a"), "same", "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_save_reports_unwritable_directory() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        std::fs::write(temp_dir.path().join("blocked"), "x").unwrap();
        let store = FsArtifactStore::new(temp_dir.path());

        let err = store
            .save(Path::new("blocked/inner"), "name", "{}")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::CreateDir { .. }));
    }
}
