//! Playback session state machine

/// Playback lifecycle state. Transient; at most one `Playing` exists
/// process-wide (enforced by the owning session).
///
/// State machine:
///   IDLE -> PLAYING (play)
///   PLAYING(e) -> IDLE (play(e) toggle, completion, or stop)
///   PLAYING(e) -> IDLE -> PLAYING(e2) (play(e2), e2 != e)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing {
        entry_id: String,
        position_ms: u64,
        duration_ms: u64,
    },
}

impl PlaybackState {
    /// Enter the playing state for an entry, position unknown yet
    pub fn playing(entry_id: impl Into<String>) -> Self {
        Self::Playing {
            entry_id: entry_id.into(),
            position_ms: 0,
            duration_ms: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    /// Id of the currently playing entry, if any
    pub fn playing_id(&self) -> Option<&str> {
        match self {
            Self::Playing { entry_id, .. } => Some(entry_id),
            Self::Idle => None,
        }
    }

    /// Whether `id` is the entry currently playing
    pub fn is_playing_entry(&self, id: &str) -> bool {
        self.playing_id() == Some(id)
    }

    /// Update progress from an engine event. Ignored when idle.
    pub fn progress(&mut self, position: u64, duration: u64) {
        if let Self::Playing {
            position_ms,
            duration_ms,
            ..
        } = self
        {
            *position_ms = position;
            *duration_ms = duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let state = PlaybackState::default();
        assert!(state.is_idle());
        assert!(state.playing_id().is_none());
    }

    #[test]
    fn playing_tracks_entry_id() {
        let state = PlaybackState::playing("1700000000000");
        assert!(state.is_playing());
        assert!(state.is_playing_entry("1700000000000"));
        assert!(!state.is_playing_entry("999"));
    }

    #[test]
    fn progress_updates_position() {
        let mut state = PlaybackState::playing("1");
        state.progress(1500, 5000);
        assert_eq!(
            state,
            PlaybackState::Playing {
                entry_id: "1".into(),
                position_ms: 1500,
                duration_ms: 5000,
            }
        );
    }

    #[test]
    fn progress_while_idle_is_ignored() {
        let mut state = PlaybackState::Idle;
        state.progress(1500, 5000);
        assert!(state.is_idle());
    }
}
