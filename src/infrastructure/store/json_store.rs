//! JSON catalog store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::CatalogStore;
use crate::domain::config::default_catalog_path;
use crate::domain::error::StorageError;

/// Catalog persisted as one JSON document on disk.
///
/// Saves go through a sibling temp file and a rename, so a crashed write
/// never leaves a truncated catalog behind.
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    /// Store at the platform default location
    pub fn new() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }

    /// Store at a custom location
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for JsonCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for JsonCatalogStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError(e.to_string())),
        }
    }

    async fn save(&self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteError(e.to_string()))?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, blob)
            .await
            .map_err(|e| StorageError::WriteError(e.to_string()))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StorageError::WriteError(e.to_string()))
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_missing_blob_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::with_path(dir.path().join("catalog.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::with_path(dir.path().join("catalog.json"));

        store.save("[]").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("[]"));

        store.save(r#"[{"id":"1"}]"#).await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::with_path(dir.path().join("nested/deep/catalog.json"));
        store.save("[]").await.unwrap();
        assert!(store.location().exists());
    }

    #[tokio::test]
    async fn save_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let store = JsonCatalogStore::with_path(&path);
        store.save("[]").await.unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn default_location_is_under_data_dir() {
        let store = JsonCatalogStore::new();
        assert!(store
            .location()
            .to_string_lossy()
            .contains("dictaphone"));
    }
}
