//! Playback state representation
//!
//! The mutable countdown position inside a flattened interval sequence,
//! plus the coarse lifecycle status derived from it.

use serde::Serialize;

/// Lifecycle status of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// The sequence has no intervals; there is nothing to play.
    Empty,
    /// Loaded at the first interval, clock stopped.
    Idle,
    /// Counting down.
    Running,
    /// Counting stopped mid-sequence.
    Paused,
    /// The last interval has counted down to zero.
    Finished,
    /// The caller relinquished the session. Terminal.
    Cancelled,
}

impl PlaybackStatus {
    /// Returns `true` if `start` would begin counting from this status.
    #[must_use]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Paused)
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Countdown position within a flattened sequence.
///
/// Created at index 0 with the first interval's full duration loaded and
/// the clock stopped. Only [`PlaybackEngine`](super::PlaybackEngine)
/// mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    /// Current interval index (0-based).
    pub index: usize,
    /// Whole seconds left in the current interval.
    pub remaining: u32,
    /// Whether the clock is counting.
    pub running: bool,
}

impl PlaybackState {
    /// Creates the initial state for a sequence whose first interval lasts
    /// `first_duration` seconds (0 for an empty sequence).
    #[must_use]
    pub const fn new(first_duration: u32) -> Self {
        Self {
            index: 0,
            remaining: first_duration,
            running: false,
        }
    }
}
