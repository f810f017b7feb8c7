//! Microphone permission gate

use std::sync::Arc;

use crate::application::ports::{Grant, Microphone};
use crate::domain::error::PermissionError;

/// Rationale surfaced to the user when requesting microphone access
pub const MICROPHONE_RATIONALE: &str =
    "Dictaphone needs access to your microphone to record audio";

/// Ensures microphone access before capture.
///
/// Never mutates session state; callers must not start capture when this
/// fails. `PermissionError::PermanentlyDenied` is the cue to point the
/// user at system settings.
pub struct PermissionGate<M: Microphone> {
    microphone: Arc<M>,
}

impl<M: Microphone> PermissionGate<M> {
    pub fn new(microphone: Arc<M>) -> Self {
        Self { microphone }
    }

    /// Check the current grant, requesting it with a rationale if needed.
    pub async fn ensure(&self) -> Result<(), PermissionError> {
        if self.microphone.check().await {
            return Ok(());
        }

        match self.microphone.request(MICROPHONE_RATIONALE).await {
            Grant::Granted => Ok(()),
            Grant::Denied => Err(PermissionError::Denied),
            Grant::PermanentlyDenied => Err(PermissionError::PermanentlyDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MockMicrophone;

    #[tokio::test]
    async fn granted_permission_skips_request() {
        let mic = Arc::new(MockMicrophone::granted());
        let gate = PermissionGate::new(Arc::clone(&mic));

        gate.ensure().await.unwrap();
        assert_eq!(mic.request_count(), 0);
    }

    #[tokio::test]
    async fn ungranted_permission_is_requested_once() {
        let mic = Arc::new(MockMicrophone::ungranted(Grant::Granted));
        let gate = PermissionGate::new(Arc::clone(&mic));

        gate.ensure().await.unwrap();
        assert_eq!(mic.request_count(), 1);

        // now granted, no further requests
        gate.ensure().await.unwrap();
        assert_eq!(mic.request_count(), 1);
    }

    #[tokio::test]
    async fn denied_request_fails() {
        let mic = Arc::new(MockMicrophone::ungranted(Grant::Denied));
        let gate = PermissionGate::new(mic);

        let err = gate.ensure().await.unwrap_err();
        assert!(matches!(err, PermissionError::Denied));
    }

    #[tokio::test]
    async fn permanently_denied_points_at_settings() {
        let mic = Arc::new(MockMicrophone::ungranted(Grant::PermanentlyDenied));
        let gate = PermissionGate::new(mic);

        let err = gate.ensure().await.unwrap_err();
        assert!(matches!(err, PermissionError::PermanentlyDenied));
        assert!(err.to_string().contains("system settings"));
    }
}
