//! Native audio engine adapters

mod cpal_capture;
mod rodio_playback;

pub use cpal_capture::CpalCaptureEngine;
pub use rodio_playback::RodioPlaybackEngine;
