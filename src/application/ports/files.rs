//! Filesystem port interface

use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Port for filesystem operations on recording files
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Whether a file exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all missing parents
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy `src` to `dst`, overwriting `dst` if present
    async fn copy(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Delete the file at `path`
    async fn remove(&self, path: &Path) -> io::Result<()>;
}
