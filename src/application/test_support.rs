//! In-memory fakes for the port interfaces, shared by unit tests

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;

use crate::application::ports::{
    CaptureEngine, CaptureStop, CatalogStore, EngineError, FileStore, Grant, Microphone,
    PlaybackEngine, PlaybackProgress, ProgressCallback, Subscription, TickCallback,
};
use crate::domain::error::StorageError;

/// Filesystem fake backed by a set of known paths
#[derive(Default)]
pub struct MemoryFileStore {
    files: StdMutex<HashSet<PathBuf>>,
    fail_next_copy: AtomicBool,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl AsRef<Path>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    pub fn delete(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.lock().unwrap().contains(path.as_ref())
    }

    /// All known paths, for leak assertions
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().iter().cloned().collect()
    }

    /// Make the next copy fail with a permission error
    pub fn fail_next_copy(&self) {
        self.fail_next_copy.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn exists(&self, path: &Path) -> bool {
        self.contains(path)
    }

    async fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    async fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        if self.fail_next_copy.swap(false, Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "copy refused"));
        }
        if !self.contains(src) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "source missing"));
        }
        self.put(dst);
        Ok(())
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        if !self.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file missing"));
        }
        self.delete(path);
        Ok(())
    }
}

/// Catalog store fake holding the blob in memory
#[derive(Default)]
pub struct MemoryCatalogStore {
    blob: StdMutex<Option<String>>,
    fail_next_save: AtomicBool,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().unwrap().clone()
    }

    pub fn set_blob(&self, blob: impl Into<String>) {
        *self.blob.lock().unwrap() = Some(blob.into());
    }

    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob())
    }

    async fn save(&self, blob: &str) -> Result<(), StorageError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StorageError::WriteError("save refused".into()));
        }
        self.set_blob(blob);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("/memory/catalog.json")
    }
}

/// Capture engine fake. `stop` materializes the temp file in the paired
/// `MemoryFileStore`, the way a real engine flushes its file on finalize.
pub struct MockCaptureEngine {
    files: std::sync::Arc<MemoryFileStore>,
    active: StdMutex<Option<PathBuf>>,
    listener: std::sync::Arc<StdMutex<Option<TickCallback>>>,
    fail_next_start: AtomicBool,
    starts: AtomicU32,
    stops: AtomicU32,
}

impl MockCaptureEngine {
    pub fn new(files: std::sync::Arc<MemoryFileStore>) -> Self {
        Self {
            files,
            active: StdMutex::new(None),
            listener: std::sync::Arc::new(StdMutex::new(None)),
            fail_next_start: AtomicBool::new(false),
            starts: AtomicU32::new(0),
            stops: AtomicU32::new(0),
        }
    }

    pub fn fail_next_start(&self) {
        self.fail_next_start.store(true, Ordering::SeqCst);
    }

    /// Deliver a tick to the registered listener, if any
    pub fn tick(&self, elapsed_ms: u64) {
        let listener = self.listener.lock().unwrap().clone();
        if let Some(cb) = listener {
            cb(elapsed_ms);
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn start_count(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureEngine for MockCaptureEngine {
    async fn start(&self, path: &Path) -> Result<PathBuf, EngineError> {
        if self.fail_next_start.swap(false, Ordering::SeqCst) {
            return Err(EngineError::StartCapture("device rejected".into()));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.active.lock().unwrap() = Some(path.to_path_buf());
        Ok(path.to_path_buf())
    }

    async fn stop(&self) -> Result<CaptureStop, EngineError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        match self.active.lock().unwrap().take() {
            Some(path) => {
                self.files.put(&path);
                Ok(CaptureStop::Finished(path))
            }
            None => Ok(CaptureStop::AlreadyStopped),
        }
    }

    fn subscribe(&self, callback: TickCallback) -> Subscription {
        *self.listener.lock().unwrap() = Some(callback);
        let slot = std::sync::Arc::clone(&self.listener);
        Subscription::new(move || {
            *slot.lock().unwrap() = None;
        })
    }
}

/// Playback engine fake with manual progress event injection
pub struct MockPlaybackEngine {
    playing: StdMutex<Option<PathBuf>>,
    listener: std::sync::Arc<StdMutex<Option<ProgressCallback>>>,
    fail_next_start: AtomicBool,
    starts: AtomicU32,
    stops: AtomicU32,
}

impl Default for MockPlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlaybackEngine {
    pub fn new() -> Self {
        Self {
            playing: StdMutex::new(None),
            listener: std::sync::Arc::new(StdMutex::new(None)),
            fail_next_start: AtomicBool::new(false),
            starts: AtomicU32::new(0),
            stops: AtomicU32::new(0),
        }
    }

    pub fn fail_next_start(&self) {
        self.fail_next_start.store(true, Ordering::SeqCst);
    }

    /// Deliver a progress event to the registered listener, if any
    pub fn emit(&self, position_ms: u64, duration_ms: u64) {
        let listener = self.listener.lock().unwrap().clone();
        if let Some(cb) = listener {
            cb(PlaybackProgress {
                position_ms,
                duration_ms,
            });
        }
    }

    pub fn playing_path(&self) -> Option<PathBuf> {
        self.playing.lock().unwrap().clone()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn start_count(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaybackEngine for MockPlaybackEngine {
    async fn start(&self, path: &Path) -> Result<(), EngineError> {
        if self.fail_next_start.swap(false, Ordering::SeqCst) {
            return Err(EngineError::StartPlayback("device rejected".into()));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.playing.lock().unwrap() = Some(path.to_path_buf());
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        *self.playing.lock().unwrap() = None;
        Ok(())
    }

    fn subscribe(&self, callback: ProgressCallback) -> Subscription {
        *self.listener.lock().unwrap() = Some(callback);
        let slot = std::sync::Arc::clone(&self.listener);
        Subscription::new(move || {
            *slot.lock().unwrap() = None;
        })
    }
}

/// Permission fake with a scripted grant response
pub struct MockMicrophone {
    granted: AtomicBool,
    response: StdMutex<Grant>,
    requests: AtomicU32,
}

impl MockMicrophone {
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            response: StdMutex::new(Grant::Granted),
            requests: AtomicU32::new(0),
        }
    }

    pub fn ungranted(response: Grant) -> Self {
        Self {
            granted: AtomicBool::new(false),
            response: StdMutex::new(response),
            requests: AtomicU32::new(0),
        }
    }

    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Microphone for MockMicrophone {
    async fn check(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request(&self, _rationale: &str) -> Grant {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let response = *self.response.lock().unwrap();
        if response.is_granted() {
            self.granted.store(true, Ordering::SeqCst);
        }
        response
    }
}
