//! Microphone permission port interface

use async_trait::async_trait;

/// Outcome of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Granted,
    Denied,
    /// Denied and the platform will not ask again; the user must flip the
    /// switch in system settings.
    PermanentlyDenied,
}

impl Grant {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Port for the platform microphone permission broker
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Whether capture permission is currently granted
    async fn check(&self) -> bool;

    /// Request permission, surfacing `rationale` to the user
    async fn request(&self, rationale: &str) -> Grant;
}
