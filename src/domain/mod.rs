//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod playback;
pub mod recording;

// Re-export common types
pub use capture::CaptureState;
pub use config::AppConfig;
pub use error::*;
pub use playback::PlaybackState;
pub use recording::RecordingEntry;
