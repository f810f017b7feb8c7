//! Host microphone permission adapter

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{Grant, Microphone};

/// Desktop permission adapter.
///
/// Desktop platforms have no application-level microphone broker; access
/// is granted implicitly (the OS may still show its own one-time prompt
/// when the device is first opened). The rationale is logged so the flow
/// stays observable.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostMicrophone;

impl HostMicrophone {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Microphone for HostMicrophone {
    async fn check(&self) -> bool {
        true
    }

    async fn request(&self, rationale: &str) -> Grant {
        debug!(rationale, "microphone access requested");
        Grant::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn host_access_is_granted() {
        let mic = HostMicrophone::new();
        assert!(mic.check().await);
        assert!(mic.request("test").await.is_granted());
    }
}
