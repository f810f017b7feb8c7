//! Deck: cross-session coordinator for the shared audio device

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::warn;

use crate::application::capture::{CaptureError, CaptureSession};
use crate::application::catalog::RecordingCatalog;
use crate::application::playback::{PlaybackError, PlaybackSession};
use crate::application::ports::{
    CaptureEngine, CatalogStore, FileStore, Microphone, PlaybackEngine,
};
use crate::domain::config::AppConfig;
use crate::domain::playback::PlaybackState;
use crate::domain::recording::RecordingEntry;

/// Owns the capture session, the playback session, and the shared catalog
/// for the lifetime of the recorder feature.
///
/// The device audio hardware is a single shared resource: the deck stops
/// any active playback before starting a capture, and `close` resolves
/// all pending work deterministically. There is no ambient singleton; the
/// deck is constructed and destroyed with the feature itself.
pub struct Deck<CE, PE, M, F, S>
where
    CE: CaptureEngine,
    PE: PlaybackEngine + 'static,
    M: Microphone,
    F: FileStore,
    S: CatalogStore,
{
    capture: CaptureSession<CE, M, F, S>,
    playback: PlaybackSession<PE, F, S>,
    catalog: Arc<Mutex<RecordingCatalog<S, F>>>,
}

impl<CE, PE, M, F, S> Deck<CE, PE, M, F, S>
where
    CE: CaptureEngine,
    PE: PlaybackEngine + 'static,
    M: Microphone,
    F: FileStore,
    S: CatalogStore,
{
    /// Wire up the sessions and load the persisted catalog.
    ///
    /// A failed catalog load is recorded but never blocks opening; the
    /// deck starts with an empty (or pruned) catalog either way.
    pub async fn open(
        capture_engine: Arc<CE>,
        playback_engine: Arc<PE>,
        microphone: Arc<M>,
        files: Arc<F>,
        store: Arc<S>,
        config: &AppConfig,
    ) -> Self {
        let mut catalog = RecordingCatalog::new(store, Arc::clone(&files));
        if let Err(e) = catalog.load().await {
            warn!(error = %e, "failed to load recording catalog; starting empty");
        }
        let catalog = Arc::new(Mutex::new(catalog));

        let capture = CaptureSession::new(
            capture_engine,
            microphone,
            Arc::clone(&files),
            Arc::clone(&catalog),
            config.recordings_dir(),
            config.cache_dir(),
        );
        let playback = PlaybackSession::new(playback_engine, files, Arc::clone(&catalog));

        Self {
            capture,
            playback,
            catalog,
        }
    }

    /// Start recording. Stops any active playback first; the hardware is
    /// shared and the handover is an explicit precondition, not a side
    /// effect of the engine.
    pub async fn start_recording(&self) -> Result<(), CaptureError> {
        if self.playback.is_playing() {
            if let Err(e) = self.playback.stop().await {
                warn!(error = %e, "failed to stop playback before capture");
            }
        }
        self.capture.start().await
    }

    /// Stop recording and save. No-op when idle.
    pub async fn stop_recording(&self) -> Result<Option<RecordingEntry>, CaptureError> {
        self.capture.stop().await
    }

    /// Play the entry with this id, or toggle it off if already playing.
    pub async fn play(&self, id: &str) -> Result<(), PlaybackError> {
        let entry = {
            let catalog = self.catalog.lock().await;
            catalog
                .get(id)
                .cloned()
                .ok_or_else(|| PlaybackError::UnknownEntry(id.to_string()))?
        };
        self.playback.play(&entry).await
    }

    /// Stop playback. No-op when idle.
    pub async fn stop_playback(&self) -> Result<(), PlaybackError> {
        self.playback.stop().await
    }

    /// Delete an entry and its backing file. Unknown ids are a no-op.
    pub async fn delete(
        &self,
        id: &str,
    ) -> Result<bool, crate::domain::error::StorageError> {
        if self.playback.playing_id().as_deref() == Some(id) {
            if let Err(e) = self.playback.stop().await {
                warn!(error = %e, "failed to stop playback of deleted entry");
            }
        }
        self.catalog.lock().await.delete(id).await
    }

    /// Snapshot of the catalog in insertion order
    pub async fn entries(&self) -> Vec<RecordingEntry> {
        self.catalog.lock().await.entries().to_vec()
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Subscribe to the displayed capture timer
    pub fn timer(&self) -> watch::Receiver<String> {
        self.capture.timer()
    }

    /// Subscribe to playback progress and completion
    pub fn playback_state(&self) -> watch::Receiver<PlaybackState> {
        self.playback.watch_state()
    }

    /// Deterministic teardown: stop-and-save any in-flight capture, stop
    /// playback, release all listeners. Failures are recorded; teardown
    /// always completes.
    pub async fn close(&self) {
        if let Err(e) = self.capture.stop().await {
            warn!(error = %e, "failed to finalize capture during teardown");
        }
        if let Err(e) = self.playback.stop().await {
            warn!(error = %e, "failed to stop playback during teardown");
        }
    }
}
