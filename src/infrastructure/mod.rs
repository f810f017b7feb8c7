//! Infrastructure layer - Adapter implementations

pub mod config;
pub mod engine;
pub mod files;
pub mod permissions;
pub mod store;

// Re-export adapters
pub use config::XdgConfigStore;
pub use engine::{CpalCaptureEngine, RodioPlaybackEngine};
pub use files::TokioFileStore;
pub use permissions::HostMicrophone;
pub use store::JsonCatalogStore;
