//! Filesystem adapters

mod tokio_fs;

pub use tokio_fs::TokioFileStore;
