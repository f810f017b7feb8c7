//! Save pipeline: temp capture to permanent recording

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::catalog::RecordingCatalog;
use crate::application::ports::{CatalogStore, FileStore};
use crate::domain::error::StorageError;
use crate::domain::recording::RecordingEntry;

/// Errors from the save pipeline
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Capture file missing: {}", .0.display())]
    TempFileMissing(PathBuf),

    #[error("Failed to create recordings directory: {0}")]
    CreateDir(#[source] io::Error),

    #[error("Failed to copy capture into recordings directory: {0}")]
    Copy(#[source] io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Moves a finished capture from temporary storage into the permanent
/// recordings directory and appends it to the catalog.
///
/// The transfer is copy-then-delete, never a move: a failed copy must not
/// destroy the only existing copy of the recording.
pub struct SavePipeline<F: FileStore> {
    files: Arc<F>,
    recordings_dir: PathBuf,
}

impl<F: FileStore> SavePipeline<F> {
    pub fn new(files: Arc<F>, recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            files,
            recordings_dir: recordings_dir.into(),
        }
    }

    /// Permanent recordings directory
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Run the pipeline for a capture finished at `timestamp_ms`.
    ///
    /// On any failure the previously persisted catalog and the temp file
    /// are left as they were.
    pub async fn run<S: CatalogStore>(
        &self,
        catalog: &mut RecordingCatalog<S, F>,
        temp_path: &Path,
        timestamp_ms: u64,
    ) -> Result<RecordingEntry, SaveError> {
        if !self.files.exists(temp_path).await {
            return Err(SaveError::TempFileMissing(temp_path.to_path_buf()));
        }

        self.files
            .create_dir_all(&self.recordings_dir)
            .await
            .map_err(SaveError::CreateDir)?;

        let extension = temp_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("wav");
        let destination = self
            .recordings_dir
            .join(format!("recording_{}.{}", timestamp_ms, extension));

        self.files
            .copy(temp_path, &destination)
            .await
            .map_err(SaveError::Copy)?;

        // The permanent copy is durable; a leftover temp file is only a
        // cache-cleanup concern.
        if let Err(e) = self.files.remove(temp_path).await {
            warn!(path = %temp_path.display(), error = %e, "failed to remove temp capture");
        }

        let entry = RecordingEntry::new(timestamp_ms, &destination, catalog.next_display_name());
        catalog.append(entry.clone()).await?;

        info!(id = %entry.id, path = %destination.display(), "recording saved");
        Ok(entry)
    }
}
