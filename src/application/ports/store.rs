//! Catalog persistence port interface

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::error::StorageError;

/// Port for the persisted catalog blob.
///
/// The catalog is stored as one serialized document at a single location;
/// every save replaces the whole blob atomically.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load the raw blob. `None` means nothing has been persisted yet,
    /// which callers treat as an empty catalog.
    async fn load(&self) -> Result<Option<String>, StorageError>;

    /// Atomically replace the persisted blob
    async fn save(&self, blob: &str) -> Result<(), StorageError>;

    /// Where the blob lives
    fn location(&self) -> PathBuf;
}
