//! Playback engine using rodio
//!
//! Each playback runs on its own blocking thread owning the output stream
//! and sink (`rodio::OutputStream` is not `Send`). The thread polls the
//! sink position and reports progress to the registered listener; when
//! the sink drains naturally it emits one final event with position equal
//! to duration, which is the engine's completion signal.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::ports::{
    EngineError, PlaybackEngine, PlaybackProgress, ProgressCallback, Subscription,
};

/// Cadence of progress events delivered to the listener
const PROGRESS_INTERVAL_MS: u64 = 100;

pub struct RodioPlaybackEngine {
    listener: Arc<StdMutex<Option<ProgressCallback>>>,
    stop_flag: Arc<AtomicBool>,
    active: Mutex<Option<JoinHandle<()>>>,
}

impl RodioPlaybackEngine {
    pub fn new() -> Self {
        Self {
            listener: Arc::new(StdMutex::new(None)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            active: Mutex::new(None),
        }
    }

    fn emit(listener: &Arc<StdMutex<Option<ProgressCallback>>>, progress: PlaybackProgress) {
        let callback = listener.lock().ok().and_then(|slot| slot.clone());
        if let Some(callback) = callback {
            callback(progress);
        }
    }

    fn run_playback_thread(
        path: std::path::PathBuf,
        listener: Arc<StdMutex<Option<ProgressCallback>>>,
        stop_flag: Arc<AtomicBool>,
        ready: oneshot::Sender<Result<(), EngineError>>,
    ) {
        let result = (|| -> Result<(OutputStream, rodio::OutputStreamHandle, Sink, u64), EngineError> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| EngineError::StartPlayback(e.to_string()))?;
            let sink =
                Sink::try_new(&handle).map_err(|e| EngineError::StartPlayback(e.to_string()))?;

            let file = File::open(&path)
                .map_err(|e| EngineError::StartPlayback(e.to_string()))?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| EngineError::StartPlayback(e.to_string()))?;

            let duration_ms = source
                .total_duration()
                .map(|d| d.as_millis() as u64)
                .or_else(|| wav_duration_ms(&path))
                .unwrap_or(0);

            sink.append(source);
            Ok((stream, handle, sink, duration_ms))
        })();

        let (stream, _handle, sink, duration_ms) = match result {
            Ok(parts) => parts,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        while !stop_flag.load(Ordering::SeqCst) && !sink.empty() {
            std::thread::sleep(std::time::Duration::from_millis(PROGRESS_INTERVAL_MS));
            if sink.empty() {
                break;
            }
            let position_ms = sink.get_pos().as_millis() as u64;
            // intermediate events never look like the completion signal
            let position_ms = if duration_ms > 0 {
                position_ms.min(duration_ms.saturating_sub(1))
            } else {
                position_ms
            };
            Self::emit(
                &listener,
                PlaybackProgress {
                    position_ms,
                    duration_ms,
                },
            );
        }

        if !stop_flag.load(Ordering::SeqCst) && duration_ms > 0 {
            // natural completion
            Self::emit(
                &listener,
                PlaybackProgress {
                    position_ms: duration_ms,
                    duration_ms,
                },
            );
        }

        drop(sink);
        drop(stream);
    }
}

/// Duration of a WAV file in milliseconds, from its header
fn wav_duration_ms(path: &Path) -> Option<u64> {
    let reader = hound::WavReader::open(path).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    let frames = reader.duration() as u64;
    Some(frames * 1000 / spec.sample_rate as u64)
}

impl Default for RodioPlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaybackEngine for RodioPlaybackEngine {
    async fn start(&self, path: &Path) -> Result<(), EngineError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(EngineError::DeviceBusy);
        }

        self.stop_flag.store(false, Ordering::SeqCst);
        let (ready_tx, ready_rx) = oneshot::channel();
        let handle = {
            let path = path.to_path_buf();
            let listener = Arc::clone(&self.listener);
            let stop_flag = Arc::clone(&self.stop_flag);
            tokio::task::spawn_blocking(move || {
                Self::run_playback_thread(path, listener, stop_flag, ready_tx)
            })
        };

        match ready_rx.await {
            Ok(Ok(())) => {
                *active = Some(handle);
                debug!(path = %path.display(), "playback started");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(EngineError::StartPlayback("playback thread exited".into())),
        }
    }

    async fn stop(&self) -> Result<(), EngineError> {
        let mut active = self.active.lock().await;
        let Some(handle) = active.take() else {
            // already idle; stop is idempotent
            return Ok(());
        };

        self.stop_flag.store(true, Ordering::SeqCst);
        let _ = handle.await;
        Ok(())
    }

    fn subscribe(&self, callback: ProgressCallback) -> Subscription {
        if let Ok(mut slot) = self.listener.lock() {
            *slot = Some(callback);
        }
        let slot = Arc::clone(&self.listener);
        Subscription::new(move || {
            if let Ok(mut slot) = slot.lock() {
                *slot = None;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_duration_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        // two seconds of silence
        for _ in 0..16_000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert_eq!(wav_duration_ms(&path), Some(2_000));
    }

    #[test]
    fn missing_file_has_no_duration() {
        assert_eq!(wav_duration_ms(Path::new("/nope/missing.wav")), None);
    }

    #[tokio::test]
    async fn stop_when_idle_is_a_noop() {
        let engine = RodioPlaybackEngine::new();
        engine.stop().await.unwrap();
    }

    #[tokio::test]
    async fn start_on_missing_file_fails() {
        let engine = RodioPlaybackEngine::new();
        let err = engine.start(Path::new("/nope/missing.wav")).await;
        assert!(err.is_err());
    }
}
