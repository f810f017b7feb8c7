//! Cross-platform capture engine using cpal
//!
//! Samples are buffered in memory at the device's native rate (mixed to
//! mono) and flushed to a WAV file when the capture is finalized.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::{oneshot, Mutex};
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{debug, warn};

use crate::application::ports::{
    CaptureEngine, CaptureStop, EngineError, Subscription, TickCallback,
};

/// Cadence of elapsed-time ticks delivered to the listener
const TICK_INTERVAL_MS: u64 = 200;

/// Poll cadence of the blocking thread waiting for the stop request
const STOP_POLL_MS: u64 = 50;

struct ActiveCapture {
    path: PathBuf,
    finalized: oneshot::Receiver<Result<(), EngineError>>,
}

/// Capture engine backed by a cpal input stream.
///
/// `cpal::Stream` is not `Send`, so each capture runs on its own blocking
/// thread which owns the stream and writes the WAV file once the stop
/// flag is raised.
pub struct CpalCaptureEngine {
    buffer: Arc<StdMutex<Vec<i16>>>,
    sample_rate: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
    listener: Arc<StdMutex<Option<TickCallback>>>,
    active: Mutex<Option<ActiveCapture>>,
}

impl CpalCaptureEngine {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(StdMutex::new(Vec::new())),
            sample_rate: Arc::new(AtomicU32::new(0)),
            is_recording: Arc::new(AtomicBool::new(false)),
            listener: Arc::new(StdMutex::new(None)),
            active: Mutex::new(None),
        }
    }

    fn input_device() -> Result<cpal::Device, EngineError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(EngineError::NoAudioDevice)
    }

    /// Mix interleaved frames down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }
        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), EngineError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| EngineError::StopCapture(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| EngineError::StopCapture(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| EngineError::StopCapture(e.to_string()))
    }

    fn run_capture_thread(
        path: PathBuf,
        buffer: Arc<StdMutex<Vec<i16>>>,
        sample_rate: Arc<AtomicU32>,
        is_recording: Arc<AtomicBool>,
        ready: oneshot::Sender<Result<(), EngineError>>,
        finalized: oneshot::Sender<Result<(), EngineError>>,
    ) {
        let stream = match Self::open_stream(&buffer, &sample_rate, &is_recording) {
            Ok(stream) => stream,
            Err(e) => {
                is_recording.store(false, Ordering::SeqCst);
                let _ = ready.send(Err(e));
                return;
            }
        };

        if let Err(e) = stream.play() {
            is_recording.store(false, Ordering::SeqCst);
            let _ = ready.send(Err(EngineError::StartCapture(e.to_string())));
            return;
        }
        let _ = ready.send(Ok(()));

        while is_recording.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(STOP_POLL_MS));
        }
        drop(stream);

        let samples = match buffer.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => {
                let _ = finalized.send(Err(EngineError::StopCapture(
                    "capture buffer poisoned".into(),
                )));
                return;
            }
        };
        let rate = sample_rate.load(Ordering::SeqCst).max(1);
        let _ = finalized.send(Self::write_wav(&path, &samples, rate));
    }

    fn open_stream(
        buffer: &Arc<StdMutex<Vec<i16>>>,
        sample_rate: &Arc<AtomicU32>,
        is_recording: &Arc<AtomicBool>,
    ) -> Result<cpal::Stream, EngineError> {
        let device = Self::input_device()?;
        let config = device
            .default_input_config()
            .map_err(|e| EngineError::StartCapture(e.to_string()))?;

        let channels = config.channels();
        sample_rate.store(config.sample_rate().0, Ordering::SeqCst);
        let stream_config: cpal::StreamConfig = config.clone().into();

        let stream = match config.sample_format() {
            SampleFormat::I16 => {
                let buffer = Arc::clone(buffer);
                let recording = Arc::clone(is_recording);
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            if recording.load(Ordering::SeqCst) {
                                let mono = Self::mix_to_mono(data, channels);
                                if let Ok(mut buffer) = buffer.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| warn!(error = %err, "capture stream error"),
                        None,
                    )
                    .map_err(|e| EngineError::StartCapture(e.to_string()))?
            }
            SampleFormat::F32 => {
                let buffer = Arc::clone(buffer);
                let recording = Arc::clone(is_recording);
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            if recording.load(Ordering::SeqCst) {
                                let as_i16: Vec<i16> =
                                    data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                let mono = Self::mix_to_mono(&as_i16, channels);
                                if let Ok(mut buffer) = buffer.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| warn!(error = %err, "capture stream error"),
                        None,
                    )
                    .map_err(|e| EngineError::StartCapture(e.to_string()))?
            }
            other => {
                return Err(EngineError::StartCapture(format!(
                    "unsupported sample format: {:?}",
                    other
                )))
            }
        };

        Ok(stream)
    }
}

impl Default for CpalCaptureEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureEngine for CpalCaptureEngine {
    async fn start(&self, path: &Path) -> Result<PathBuf, EngineError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(EngineError::DeviceBusy);
        }

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
        self.is_recording.store(true, Ordering::SeqCst);

        let (ready_tx, ready_rx) = oneshot::channel();
        let (finalized_tx, finalized_rx) = oneshot::channel();
        {
            let path = path.to_path_buf();
            let buffer = Arc::clone(&self.buffer);
            let sample_rate = Arc::clone(&self.sample_rate);
            let is_recording = Arc::clone(&self.is_recording);
            tokio::task::spawn_blocking(move || {
                Self::run_capture_thread(
                    path,
                    buffer,
                    sample_rate,
                    is_recording,
                    ready_tx,
                    finalized_tx,
                )
            });
        }

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.is_recording.store(false, Ordering::SeqCst);
                return Err(e);
            }
            Err(_) => {
                self.is_recording.store(false, Ordering::SeqCst);
                return Err(EngineError::StartCapture("capture thread exited".into()));
            }
        }

        // elapsed-time ticks on a steady cadence, for as long as the
        // capture is live
        {
            let is_recording = Arc::clone(&self.is_recording);
            let listener = Arc::clone(&self.listener);
            let started = Instant::now();
            tokio::spawn(async move {
                let mut ticker = interval(TokioDuration::from_millis(TICK_INTERVAL_MS));
                while is_recording.load(Ordering::SeqCst) {
                    ticker.tick().await;
                    let callback = listener.lock().ok().and_then(|slot| slot.clone());
                    if let Some(callback) = callback {
                        callback(started.elapsed().as_millis() as u64);
                    }
                }
            });
        }

        *active = Some(ActiveCapture {
            path: path.to_path_buf(),
            finalized: finalized_rx,
        });
        debug!(path = %path.display(), "capture started");
        Ok(path.to_path_buf())
    }

    async fn stop(&self) -> Result<CaptureStop, EngineError> {
        let mut active = self.active.lock().await;
        let Some(capture) = active.take() else {
            return Ok(CaptureStop::AlreadyStopped);
        };

        self.is_recording.store(false, Ordering::SeqCst);
        match capture.finalized.await {
            Ok(Ok(())) => Ok(CaptureStop::Finished(capture.path)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(EngineError::StopCapture("capture thread exited".into())),
        }
    }

    fn subscribe(&self, callback: TickCallback) -> Subscription {
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
    fn mono_mixdown_averages_frames() {
        let stereo = [100i16, 200, -100, -200];
        assert_eq!(CpalCaptureEngine::mix_to_mono(&stereo, 2), vec![150, -150]);
    }

    #[test]
    fn mono_input_passes_through() {
        let mono = [1i16, 2, 3];
        assert_eq!(CpalCaptureEngine::mix_to_mono(&mono, 1), vec![1, 2, 3]);
    }

    #[test]
    fn wav_write_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.wav");
        let samples = vec![0i16, 1000, -1000, 32767];

        CpalCaptureEngine::write_wav(&path, &samples, 44_100).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 44_100);
        let back: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(back, samples);
    }

    #[tokio::test]
    async fn stop_without_start_is_already_stopped() {
        let engine = CpalCaptureEngine::new();
        assert_eq!(engine.stop().await.unwrap(), CaptureStop::AlreadyStopped);
    }
}
