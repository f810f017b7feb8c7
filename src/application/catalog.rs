//! Persisted recording catalog

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ports::{CatalogStore, FileStore};
use crate::domain::error::StorageError;
use crate::domain::recording::RecordingEntry;

/// Stable filter over a freshly loaded catalog: entries whose backing file
/// no longer exists are dropped, survivor order is unchanged.
///
/// Returns the pruned sequence and whether anything was pruned, so the
/// caller can decide to rewrite storage.
pub async fn reconcile<F: FileStore>(
    files: &F,
    entries: Vec<RecordingEntry>,
) -> (Vec<RecordingEntry>, bool) {
    let before = entries.len();
    let mut survivors = Vec::with_capacity(before);
    for entry in entries {
        if files.exists(entry.path()).await {
            survivors.push(entry);
        } else {
            debug!(id = %entry.id, path = %entry.file_path.display(), "pruning entry with missing file");
        }
    }
    let pruned = survivors.len() != before;
    (survivors, pruned)
}

/// Ordered, persisted collection of recordings.
///
/// Insertion order is preserved and never re-sorted. Every mutation
/// persists the whole catalog as one blob before the in-memory sequence
/// is updated, so a failed write leaves the previously persisted state
/// intact.
pub struct RecordingCatalog<S, F>
where
    S: CatalogStore,
    F: FileStore,
{
    store: Arc<S>,
    files: Arc<F>,
    entries: Vec<RecordingEntry>,
}

impl<S, F> RecordingCatalog<S, F>
where
    S: CatalogStore,
    F: FileStore,
{
    /// Create an empty catalog over the given store
    pub fn new(store: Arc<S>, files: Arc<F>) -> Self {
        Self {
            store,
            files,
            entries: Vec::new(),
        }
    }

    /// Load the persisted catalog, self-healing against missing files.
    ///
    /// An absent blob is an empty catalog, not an error. If reconciliation
    /// prunes anything, storage is rewritten immediately with the pruned
    /// set; a failure of that rewrite is logged but does not block the
    /// load (the next load prunes again).
    pub async fn load(&mut self) -> Result<(), StorageError> {
        self.entries.clear();

        let blob = match self.store.load().await? {
            Some(blob) => blob,
            None => return Ok(()),
        };

        let loaded: Vec<RecordingEntry> = serde_json::from_str(&blob)
            .map_err(|e| StorageError::DeserializeError(e.to_string()))?;

        let (survivors, pruned) = reconcile(self.files.as_ref(), loaded).await;
        if pruned {
            if let Err(e) = self.persist(&survivors).await {
                warn!(error = %e, "failed to rewrite catalog after pruning");
            }
        }

        self.entries = survivors;
        Ok(())
    }

    /// Append an entry at the end and persist. The in-memory sequence is
    /// updated only after the write succeeds.
    pub async fn append(&mut self, entry: RecordingEntry) -> Result<(), StorageError> {
        let mut candidate = self.entries.clone();
        candidate.push(entry);
        self.persist(&candidate).await?;
        self.entries = candidate;
        Ok(())
    }

    /// Delete an entry by id. Unknown ids are a no-op (`Ok(false)`).
    ///
    /// The backing file is removed best-effort first; a failure there
    /// (file already gone) is tolerated and the entry is removed anyway,
    /// making deletion idempotent.
    pub async fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        if let Err(e) = self.files.remove(self.entries[index].path()).await {
            warn!(id, error = %e, "failed to delete recording file; removing entry anyway");
        }

        let mut candidate = self.entries.clone();
        candidate.remove(index);
        self.persist(&candidate).await?;
        self.entries = candidate;
        Ok(true)
    }

    /// Re-run reconciliation against the filesystem, rewriting storage if
    /// anything was pruned. Returns the number of entries dropped.
    pub async fn reconcile(&mut self) -> Result<usize, StorageError> {
        let (survivors, pruned) = reconcile(self.files.as_ref(), self.entries.clone()).await;
        let dropped = self.entries.len() - survivors.len();
        if pruned {
            self.persist(&survivors).await?;
            self.entries = survivors;
        }
        Ok(dropped)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[RecordingEntry] {
        &self.entries
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&RecordingEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for the next saved recording (`Recording <n>`).
    /// Names are not re-numbered after deletes.
    pub fn next_display_name(&self) -> String {
        format!("Recording {}", self.entries.len() + 1)
    }

    async fn persist(&self, entries: &[RecordingEntry]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(entries)
            .map_err(|e| StorageError::SerializeError(e.to_string()))?;
        self.store.save(&blob).await
    }
}
