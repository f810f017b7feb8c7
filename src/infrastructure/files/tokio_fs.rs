//! Filesystem adapter backed by tokio::fs

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::FileStore;

/// Real filesystem access through tokio
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileStore;

impl TokioFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for TokioFileStore {
    async fn exists(&self, path: &Path) -> bool {
        // an unreadable path counts as missing
        match fs::try_exists(path).await {
            Ok(exists) => exists,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "existence check failed");
                false
            }
        }
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        fs::copy(src, dst).await.map(|_| ())
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_keeps_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.wav");
        let dst = dir.path().join("dst.wav");
        tokio::fs::write(&src, b"audio").await.unwrap();

        let files = TokioFileStore::new();
        files.copy(&src, &dst).await.unwrap();

        assert!(files.exists(&src).await);
        assert!(files.exists(&dst).await);
        assert_eq!(tokio::fs::read(&dst).await.unwrap(), b"audio");
    }

    #[tokio::test]
    async fn remove_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let files = TokioFileStore::new();
        assert!(files.remove(&dir.path().join("gone.wav")).await.is_err());
    }

    #[tokio::test]
    async fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        let files = TokioFileStore::new();
        files.create_dir_all(&nested).await.unwrap();
        files.create_dir_all(&nested).await.unwrap();
        assert!(files.exists(&nested).await);
    }
}
