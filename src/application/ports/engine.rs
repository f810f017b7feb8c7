//! Native audio engine port interfaces

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Native engine errors
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("Failed to start capture: {0}")]
    StartCapture(String),

    #[error("Failed to stop capture: {0}")]
    StopCapture(String),

    #[error("Failed to start playback: {0}")]
    StartPlayback(String),

    #[error("Failed to stop playback: {0}")]
    StopPlayback(String),

    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Audio device is busy")]
    DeviceBusy,
}

/// Elapsed-time listener for an active capture. Receives elapsed
/// milliseconds on the engine's own cadence.
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Progress listener for active playback.
pub type ProgressCallback = Arc<dyn Fn(PlaybackProgress) + Send + Sync>;

/// One playback progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackProgress {
    pub position_ms: u64,
    pub duration_ms: u64,
}

impl PlaybackProgress {
    /// Whether this is the engine's completion event. The engine reports
    /// completion by delivering a final event with position equal to
    /// duration; sessions never infer completion from wall-clock time.
    pub fn is_complete(&self) -> bool {
        self.duration_ms > 0 && self.position_ms == self.duration_ms
    }
}

/// Outcome of finalizing a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStop {
    /// Capture finalized to this file
    Finished(PathBuf),
    /// The engine was not recording (treated as success, nothing to save)
    AlreadyStopped,
}

/// Cancellable listener registration.
///
/// Dropping the subscription unregisters the listener, so no event can be
/// delivered into a torn-down session. Each session holds at most one.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the unregister action
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Explicitly unregister now
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Port for the native capture engine
#[async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Start capturing to `path`.
    ///
    /// # Returns
    /// The path the engine is actually writing to (normally `path`).
    async fn start(&self, path: &Path) -> Result<PathBuf, EngineError>;

    /// Finalize the capture and flush the file.
    async fn stop(&self) -> Result<CaptureStop, EngineError>;

    /// Register the elapsed-time listener. The engine carries at most one;
    /// registering replaces any previous listener.
    fn subscribe(&self, callback: TickCallback) -> Subscription;
}

/// Port for the native playback engine
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Start playing the file at `path`.
    async fn start(&self, path: &Path) -> Result<(), EngineError>;

    /// Stop playback and release the output handle.
    async fn stop(&self) -> Result<(), EngineError>;

    /// Register the progress listener. The engine carries at most one;
    /// registering replaces any previous listener.
    fn subscribe(&self, callback: ProgressCallback) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn subscription_cancels_on_drop() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let sub = Subscription::new(move || flag.store(true, Ordering::SeqCst));
        drop(sub);
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn explicit_cancel_runs_once() {
        let count = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sub.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completion_requires_known_duration() {
        let zero = PlaybackProgress {
            position_ms: 0,
            duration_ms: 0,
        };
        assert!(!zero.is_complete());

        let done = PlaybackProgress {
            position_ms: 5000,
            duration_ms: 5000,
        };
        assert!(done.is_complete());

        let mid = PlaybackProgress {
            position_ms: 2500,
            duration_ms: 5000,
        };
        assert!(!mid.is_complete());
    }
}
