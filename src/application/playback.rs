//! Playback session use case

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};

use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::catalog::RecordingCatalog;
use crate::application::ports::{
    CatalogStore, EngineError, FileStore, PlaybackEngine, Subscription,
};
use crate::domain::playback::PlaybackState;
use crate::domain::recording::RecordingEntry;

/// Errors from the playback session
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No recording with id {0}")]
    UnknownEntry(String),

    #[error("Recording file missing: {}", .0.display())]
    FileMissing(PathBuf),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Owns the play lifecycle around the native playback engine.
///
/// At most one playback is active process-wide. `play` on the entry that
/// is already playing toggles it off; `play` on a different entry stops
/// the current one first.
pub struct PlaybackSession<E, F, S>
where
    E: PlaybackEngine,
    F: FileStore,
    S: CatalogStore,
{
    engine: Arc<E>,
    files: Arc<F>,
    catalog: Arc<Mutex<RecordingCatalog<S, F>>>,
    state: Arc<watch::Sender<PlaybackState>>,
    subscription: Arc<StdMutex<Option<Subscription>>>,
    monitor: StdMutex<Option<JoinHandle<()>>>,
}

impl<E, F, S> PlaybackSession<E, F, S>
where
    E: PlaybackEngine + 'static,
    F: FileStore,
    S: CatalogStore,
{
    pub fn new(
        engine: Arc<E>,
        files: Arc<F>,
        catalog: Arc<Mutex<RecordingCatalog<S, F>>>,
    ) -> Self {
        let (state, _) = watch::channel(PlaybackState::Idle);
        Self {
            engine,
            files,
            catalog,
            state: Arc::new(state),
            subscription: Arc::new(StdMutex::new(None)),
            monitor: StdMutex::new(None),
        }
    }

    /// Play an entry, or toggle it off if it is the one already playing.
    ///
    /// A missing backing file fails with `FileMissing` after kicking off a
    /// catalog reconciliation pass, so the caller can re-read the now
    /// pruned list.
    pub async fn play(&self, entry: &RecordingEntry) -> Result<(), PlaybackError> {
        if self.state.borrow().is_playing_entry(&entry.id) {
            self.stop().await?;
            return Ok(());
        }

        if self.state.borrow().is_playing() {
            self.stop().await?;
        }

        if !self.files.exists(entry.path()).await {
            self.reconcile_catalog().await;
            return Err(PlaybackError::FileMissing(entry.file_path.clone()));
        }

        self.engine.start(entry.path()).await?;
        self.state.send_replace(PlaybackState::playing(entry.id.clone()));

        let (events, receiver) = mpsc::unbounded_channel();
        let subscription = self.engine.subscribe(Arc::new(move |progress| {
            let _ = events.send(progress);
        }));
        *self.subscription.lock().unwrap() = Some(subscription);

        let monitor = self.spawn_monitor(receiver, entry.id.clone());
        *self.monitor.lock().unwrap() = Some(monitor);
        Ok(())
    }

    /// Stop playback and release the engine handle. No-op when idle.
    pub async fn stop(&self) -> Result<(), PlaybackError> {
        if self.state.borrow().is_idle() {
            return Ok(());
        }

        if let Some(monitor) = self.monitor.lock().unwrap().take() {
            monitor.abort();
        }
        self.subscription.lock().unwrap().take();

        let result = self.engine.stop().await;
        self.state.send_replace(PlaybackState::Idle);
        result?;
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().is_playing()
    }

    /// Id of the entry currently playing, if any
    pub fn playing_id(&self) -> Option<String> {
        self.state.borrow().playing_id().map(str::to_owned)
    }

    /// Snapshot of the session state
    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes (progress and completion)
    pub fn watch_state(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    fn spawn_monitor(
        &self,
        mut receiver: mpsc::UnboundedReceiver<crate::application::ports::PlaybackProgress>,
        entry_id: String,
    ) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let engine = Arc::clone(&self.engine);
        let subscription = Arc::clone(&self.subscription);
        tokio::spawn(async move {
            while let Some(progress) = receiver.recv().await {
                state.send_modify(|s| s.progress(progress.position_ms, progress.duration_ms));
                if progress.is_complete() {
                    // natural completion, reported by the engine itself
                    subscription.lock().unwrap().take();
                    if let Err(e) = engine.stop().await {
                        warn!(error = %e, "engine stop after completion failed");
                    }
                    state.send_modify(|s| {
                        if s.is_playing_entry(&entry_id) {
                            *s = PlaybackState::Idle;
                        }
                    });
                    break;
                }
            }
        })
    }

    async fn reconcile_catalog(&self) {
        let mut catalog = self.catalog.lock().await;
        match catalog.reconcile().await {
            Ok(dropped) if dropped > 0 => {
                info!(dropped, "catalog reconciled after missing playback file");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "catalog reconciliation failed"),
        }
    }
}
