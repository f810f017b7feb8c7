//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod engine;
pub mod files;
pub mod microphone;
pub mod store;

// Re-export common types
pub use config::ConfigStore;
pub use engine::{
    CaptureEngine, CaptureStop, EngineError, PlaybackEngine, PlaybackProgress, ProgressCallback,
    Subscription, TickCallback,
};
pub use files::FileStore;
pub use microphone::{Grant, Microphone};
pub use store::CatalogStore;
