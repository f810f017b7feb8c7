//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
/// All fields are optional; unset fields fall back to platform defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Permanent recordings directory
    pub recordings_dir: Option<PathBuf>,
    /// Cache directory for in-flight captures
    pub cache_dir: Option<PathBuf>,
    /// Path of the persisted catalog blob
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            recordings_dir: Some(default_recordings_dir()),
            cache_dir: Some(default_cache_dir()),
            catalog_path: Some(default_catalog_path()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recordings directory, falling back to the platform default
    pub fn recordings_dir(&self) -> PathBuf {
        self.recordings_dir.clone().unwrap_or_else(default_recordings_dir)
    }

    /// Cache directory, falling back to the platform default
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// Catalog path, falling back to the platform default
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_path.clone().unwrap_or_else(default_catalog_path)
    }
}

/// Platform default for the permanent recordings directory
pub fn default_recordings_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dictaphone")
        .join("recordings")
}

/// Platform default for the ephemeral capture directory
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dictaphone")
}

/// Platform default for the persisted catalog blob
pub fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dictaphone")
        .join("catalog.json")
}
