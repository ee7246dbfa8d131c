//! Playback
//!
//! Plays a flattened workout back as a countdown.
//!
//! # Architecture
//!
//! - [`PlaybackState`] - countdown position (index, remaining, running)
//! - [`PlaybackEngine`] - synchronous state machine driven by ticks
//! - [`PlaybackHandle`] - async driver that ticks the engine once per second
//! - [`format_clock`] - countdown rendering

pub mod clock;
pub mod engine;
pub mod state;

pub use clock::{ClockConfig, Command, PlaybackHandle};
pub use engine::{PlaybackEngine, PlaybackView, TickOutcome};
pub use state::{PlaybackState, PlaybackStatus};

/// Formats a countdown as `m:ss`, or just `ss` under a minute.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{minutes}:{seconds:02}")
    } else {
        format!("{seconds:02}")
    }
}
