//! Application layer - Use cases and port interfaces

pub mod capture;
pub mod catalog;
pub mod deck;
pub mod permission;
pub mod playback;
pub mod ports;
pub mod save;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export common types
pub use capture::{CaptureError, CaptureSession};
pub use catalog::{reconcile, RecordingCatalog};
pub use deck::Deck;
pub use permission::{PermissionGate, MICROPHONE_RATIONALE};
pub use playback::{PlaybackError, PlaybackSession};
pub use save::{SaveError, SavePipeline};
