//! Capture session use case

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::application::catalog::RecordingCatalog;
use crate::application::permission::PermissionGate;
use crate::application::ports::{
    CaptureEngine, CaptureStop, CatalogStore, EngineError, FileStore, Microphone, Subscription,
};
use crate::application::save::{SaveError, SavePipeline};
use crate::domain::capture::CaptureState;
use crate::domain::error::PermissionError;
use crate::domain::recording::{format_elapsed, RecordingEntry, IDLE_DISPLAY};

/// Errors from the capture session
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Failed to create capture cache directory: {0}")]
    CacheDir(#[source] io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Strictly increasing wall-clock millisecond source.
///
/// Consecutive calls never return the same value, so timestamp-derived
/// ids and temp paths cannot collide within a process.
#[derive(Debug, Default)]
pub struct TimestampMint {
    last: AtomicU64,
}

impl TimestampMint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(prev) => now.max(prev + 1),
            Err(_) => now,
        }
    }
}

/// Owns the record lifecycle around the native capture engine.
///
/// At most one capture is in flight; starting while recording performs an
/// implicit stop-and-save of the in-flight capture first. The displayed
/// `mm:ss` timer is published on a watch channel and is non-decreasing
/// for the duration of a session.
pub struct CaptureSession<E, M, F, S>
where
    E: CaptureEngine,
    M: Microphone,
    F: FileStore,
    S: CatalogStore,
{
    engine: Arc<E>,
    gate: PermissionGate<M>,
    files: Arc<F>,
    pipeline: SavePipeline<F>,
    catalog: Arc<Mutex<RecordingCatalog<S, F>>>,
    state: Arc<StdMutex<CaptureState>>,
    timer: Arc<watch::Sender<String>>,
    subscription: StdMutex<Option<Subscription>>,
    mint: TimestampMint,
    cache_dir: PathBuf,
}

impl<E, M, F, S> CaptureSession<E, M, F, S>
where
    E: CaptureEngine,
    M: Microphone,
    F: FileStore,
    S: CatalogStore,
{
    pub fn new(
        engine: Arc<E>,
        microphone: Arc<M>,
        files: Arc<F>,
        catalog: Arc<Mutex<RecordingCatalog<S, F>>>,
        recordings_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        let (timer, _) = watch::channel(IDLE_DISPLAY.to_string());
        Self {
            engine,
            gate: PermissionGate::new(microphone),
            pipeline: SavePipeline::new(Arc::clone(&files), recordings_dir),
            files,
            catalog,
            state: Arc::new(StdMutex::new(CaptureState::Idle)),
            timer: Arc::new(timer),
            subscription: StdMutex::new(None),
            mint: TimestampMint::new(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Start a capture.
    ///
    /// Requires microphone permission; fails with the state unchanged if
    /// it is absent or the engine rejects the request. An in-flight
    /// capture is stop-and-saved first, never dropped.
    pub async fn start(&self) -> Result<(), CaptureError> {
        self.gate.ensure().await?;

        if self.is_recording() {
            debug!("start while recording: performing implicit stop-and-save");
            self.stop().await?;
        }

        self.files
            .create_dir_all(&self.cache_dir)
            .await
            .map_err(CaptureError::CacheDir)?;

        let timestamp = self.mint.next();
        let temp_path = self.cache_dir.join(format!("temp_{}.wav", timestamp));

        let actual_path = self.engine.start(&temp_path).await?;

        *self.state.lock().unwrap() = CaptureState::recording(&actual_path);
        let _ = self.timer.send(IDLE_DISPLAY.to_string());

        let state = Arc::clone(&self.state);
        let timer = Arc::clone(&self.timer);
        let subscription = self.engine.subscribe(Arc::new(move |elapsed_ms| {
            let display = {
                let mut current = state.lock().unwrap();
                current.advance(elapsed_ms);
                format_elapsed(current.elapsed_ms())
            };
            let _ = timer.send(display);
        }));
        *self.subscription.lock().unwrap() = Some(subscription);

        Ok(())
    }

    /// Stop the capture and save it through the pipeline.
    ///
    /// A no-op when idle. Returns the saved entry, or `None` when the
    /// engine reported it had already stopped (nothing to save).
    pub async fn stop(&self) -> Result<Option<RecordingEntry>, CaptureError> {
        if !self.is_recording() {
            return Ok(None);
        }

        let outcome = self.engine.stop().await;

        // Listener, timer, and state are reset regardless of how the
        // finalize went, so a failed stop cannot wedge the session.
        self.subscription.lock().unwrap().take();
        *self.state.lock().unwrap() = CaptureState::Idle;
        let _ = self.timer.send(IDLE_DISPLAY.to_string());

        match outcome? {
            CaptureStop::AlreadyStopped => Ok(None),
            CaptureStop::Finished(temp_path) => {
                let timestamp = self.mint.next();
                let mut catalog = self.catalog.lock().await;
                let entry = self.pipeline.run(&mut catalog, &temp_path, timestamp).await?;
                Ok(Some(entry))
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state.lock().unwrap().is_recording()
    }

    /// Elapsed capture time; zero when idle
    pub fn elapsed_ms(&self) -> u64 {
        self.state.lock().unwrap().elapsed_ms()
    }

    /// Snapshot of the session state
    pub fn state(&self) -> CaptureState {
        self.state.lock().unwrap().clone()
    }

    /// Subscribe to the displayed `mm:ss` timer
    pub fn timer(&self) -> watch::Receiver<String> {
        self.timer.subscribe()
    }
}
