//! Recording catalog entry

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One saved recording.
///
/// The persisted field names (`id`, `path`, `name`, `timestamp`) are the
/// catalog's wire format; renaming them breaks previously saved catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingEntry {
    /// Unique id, the capture timestamp in milliseconds as a decimal string
    pub id: String,

    /// Absolute path of the backing audio file
    #[serde(rename = "path")]
    pub file_path: PathBuf,

    /// Human-facing name, assigned at save time
    #[serde(rename = "name")]
    pub display_name: String,

    /// Capture wall-clock time
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl RecordingEntry {
    /// Build an entry for a capture finished at `timestamp_ms` (Unix epoch
    /// milliseconds, which also becomes the id).
    pub fn new(
        timestamp_ms: u64,
        file_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
    ) -> Self {
        let created_at = DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)
            .unwrap_or_else(Utc::now);
        Self {
            id: timestamp_ms.to_string(),
            file_path: file_path.into(),
            display_name: display_name.into(),
            created_at,
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}
