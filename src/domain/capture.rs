//! Capture session state machine

use std::path::{Path, PathBuf};

/// Capture lifecycle state. Transient, never persisted.
///
/// State machine:
///   IDLE -> RECORDING (start; an already-recording session is
///   stop-and-saved first, never silently dropped)
///   RECORDING -> IDLE (stop)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording {
        elapsed_ms: u64,
        temp_path: PathBuf,
    },
}

impl CaptureState {
    /// Enter the recording state for a fresh capture
    pub fn recording(temp_path: impl Into<PathBuf>) -> Self {
        Self::Recording {
            elapsed_ms: 0,
            temp_path: temp_path.into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Temp path of the in-flight capture, if any
    pub fn temp_path(&self) -> Option<&Path> {
        match self {
            Self::Recording { temp_path, .. } => Some(temp_path),
            Self::Idle => None,
        }
    }

    /// Elapsed capture time; zero when idle
    pub fn elapsed_ms(&self) -> u64 {
        match self {
            Self::Recording { elapsed_ms, .. } => *elapsed_ms,
            Self::Idle => 0,
        }
    }

    /// Record a tick from the engine. Ignored when idle; elapsed time
    /// never moves backwards.
    pub fn advance(&mut self, ms: u64) {
        if let Self::Recording { elapsed_ms, .. } = self {
            if ms > *elapsed_ms {
                *elapsed_ms = ms;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let state = CaptureState::default();
        assert!(state.is_idle());
        assert_eq!(state.elapsed_ms(), 0);
        assert!(state.temp_path().is_none());
    }

    #[test]
    fn recording_starts_at_zero() {
        let state = CaptureState::recording("/cache/temp_1.wav");
        assert!(state.is_recording());
        assert_eq!(state.elapsed_ms(), 0);
        assert_eq!(state.temp_path(), Some(Path::new("/cache/temp_1.wav")));
    }

    #[test]
    fn advance_is_monotonic() {
        let mut state = CaptureState::recording("/cache/temp_1.wav");
        state.advance(1500);
        state.advance(800);
        assert_eq!(state.elapsed_ms(), 1500);
    }

    #[test]
    fn advance_while_idle_is_ignored() {
        let mut state = CaptureState::Idle;
        state.advance(1000);
        assert_eq!(state.elapsed_ms(), 0);
        assert!(state.is_idle());
    }
}
