//! Playback engine
//!
//! A synchronous state machine over an immutable interval sequence. The
//! engine never schedules anything itself: an external clock calls
//! [`PlaybackEngine::tick`] once per elapsed second while running, which
//! keeps the engine testable without real waits.
//!
//! Every operation that stops or restarts the clock bumps the session
//! *epoch*. A tick scheduled under an older epoch is discarded on delivery
//! (see [`PlaybackEngine::tick_at`]), so a tick already in flight when the
//! user pauses, resets, or backs out can never mutate state afterwards.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::workout::{IntervalKind, TimedInterval, WorkoutNode, flatten};

use super::state::{PlaybackState, PlaybackStatus};

/// What a single tick delivery did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, cancelled, or the tick belonged to a stale epoch.
    Ignored,
    /// Counted down within the current interval.
    Counted {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// The current interval ran out and the next one was loaded.
    Advanced {
        /// Index of the exhausted interval.
        from: usize,
        /// Index of the newly loaded interval.
        to: usize,
    },
    /// The last interval ran out.
    Finished,
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackView {
    /// Lifecycle status.
    pub status: PlaybackStatus,
    /// Kind of the current interval (`None` when there is nothing to play).
    pub kind: Option<IntervalKind>,
    /// Exercise the current interval belongs to.
    pub exercise_name: Option<String>,
    /// Seconds left in the current interval.
    pub remaining: u32,
    /// 1-based step number (0 when there is nothing to play).
    pub step: usize,
    /// Number of steps in the sequence.
    pub total_steps: usize,
}

impl PlaybackView {
    /// Returns `true` once the last interval has counted down.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == PlaybackStatus::Finished
    }

    /// Returns `true` when the sequence had no intervals at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status == PlaybackStatus::Empty
    }
}

/// Countdown state machine over a flattened workout.
pub struct PlaybackEngine {
    /// Flattened sequence, immutable for the session
    intervals: Arc<[TimedInterval]>,
    /// Countdown position
    state: PlaybackState,
    /// Lifecycle status (`state.running` mirrors `Running`)
    status: PlaybackStatus,
    /// Bumped whenever outstanding scheduled ticks become invalid
    epoch: u64,
}

impl PlaybackEngine {
    /// Creates an engine at the start of `intervals`, clock stopped.
    ///
    /// An empty sequence yields the [`PlaybackStatus::Empty`] state.
    #[must_use]
    pub fn new(intervals: impl Into<Arc<[TimedInterval]>>) -> Self {
        let intervals = intervals.into();
        let first = intervals.first().map_or(0, |i| i.duration);
        let status = if intervals.is_empty() {
            debug!("no intervals to play");
            PlaybackStatus::Empty
        } else {
            PlaybackStatus::Idle
        };

        Self {
            intervals,
            state: PlaybackState::new(first),
            status,
            epoch: 0,
        }
    }

    /// Flattens `nodes` and creates a fresh engine over the result.
    #[must_use]
    pub fn from_workout(nodes: &[WorkoutNode]) -> Self {
        Self::new(flatten(nodes))
    }

    /// Starts or resumes the countdown.
    ///
    /// Returns `true` if the engine moved to `Running`. A no-op when already
    /// running, finished, empty, or cancelled.
    pub fn start(&mut self) -> bool {
        if !self.status.can_start() {
            return false;
        }
        info!(
            step = self.state.index + 1,
            remaining = self.state.remaining,
            resumed = self.status == PlaybackStatus::Paused,
            "playback started"
        );
        self.set_status(PlaybackStatus::Running);
        self.epoch += 1;
        true
    }

    /// Pauses the countdown.
    ///
    /// Returns `true` if the engine moved from `Running` to `Paused`.
    pub fn pause(&mut self) -> bool {
        if self.status != PlaybackStatus::Running {
            return false;
        }
        info!(
            step = self.state.index + 1,
            remaining = self.state.remaining,
            "playback paused"
        );
        self.set_status(PlaybackStatus::Paused);
        self.epoch += 1;
        true
    }

    /// Counts one second off the current interval.
    ///
    /// Equivalent to [`tick_at`](Self::tick_at) with the current epoch.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(self.epoch)
    }

    /// Delivers a tick that was scheduled under `epoch`.
    ///
    /// Ticks from an older epoch, ticks while not running, and ticks after
    /// cancellation are ignored and leave the state untouched.
    pub fn tick_at(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.epoch || self.status != PlaybackStatus::Running {
            debug!(epoch, current_epoch = self.epoch, status = %self.status, "tick ignored");
            return TickOutcome::Ignored;
        }

        self.state.remaining = self.state.remaining.saturating_sub(1);
        if self.state.remaining > 0 {
            return TickOutcome::Counted {
                remaining: self.state.remaining,
            };
        }

        let from = self.state.index;
        let to = from + 1;
        if let Some(next) = self.intervals.get(to) {
            self.state.index = to;
            self.state.remaining = next.duration;
            debug!(from, to, kind = %next.kind, exercise = %next.exercise_name, "interval advanced");
            TickOutcome::Advanced { from, to }
        } else {
            info!(steps = self.intervals.len(), "playback finished");
            self.set_status(PlaybackStatus::Finished);
            self.epoch += 1;
            TickOutcome::Finished
        }
    }

    /// Returns to the first interval with the clock stopped.
    ///
    /// Valid from every status except `Cancelled`, which is terminal. An
    /// empty sequence stays `Empty`.
    pub fn reset(&mut self) {
        if self.is_cancelled() {
            debug!("reset ignored, session relinquished");
            return;
        }
        self.state = PlaybackState::new(self.intervals.first().map_or(0, |i| i.duration));
        self.status = if self.intervals.is_empty() {
            PlaybackStatus::Empty
        } else {
            PlaybackStatus::Idle
        };
        self.epoch += 1;
        info!("playback reset");
    }

    /// Relinquishes the session: stops the clock, moves to `Cancelled`, and
    /// makes every later operation a no-op. The countdown position is kept
    /// so the final view shows where the caller left.
    pub fn cancel(&mut self) {
        if self.is_cancelled() {
            return;
        }
        self.set_status(PlaybackStatus::Cancelled);
        self.epoch += 1;
        info!(step = self.state.index + 1, "playback cancelled");
    }

    /// Leaves playback; alias for [`cancel`](Self::cancel).
    pub fn back(&mut self) {
        self.cancel();
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        self.status = status;
        self.state.running = status == PlaybackStatus::Running;
    }

    // ---- Accessors ----

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Returns the countdown position.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns the epoch that ticks must carry to be honored.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns whether the clock is counting.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.running
    }

    /// Returns whether the last interval has counted down.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == PlaybackStatus::Finished
    }

    /// Returns whether there is nothing to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns whether the caller has relinquished the session.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == PlaybackStatus::Cancelled
    }

    /// Returns the interval currently counting down.
    #[must_use]
    pub fn current(&self) -> Option<&TimedInterval> {
        self.intervals.get(self.state.index)
    }

    /// Returns the flattened sequence.
    #[must_use]
    pub fn intervals(&self) -> &[TimedInterval] {
        &self.intervals
    }

    /// Returns the 1-based step number, or 0 for an empty sequence.
    #[must_use]
    pub fn step(&self) -> usize {
        if self.intervals.is_empty() {
            0
        } else {
            self.state.index + 1
        }
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.intervals.len()
    }

    /// Returns a rendering snapshot.
    #[must_use]
    pub fn view(&self) -> PlaybackView {
        let current = self.current();
        PlaybackView {
            status: self.status,
            kind: current.map(|i| i.kind),
            exercise_name: current.map(|i| i.exercise_name.clone()),
            remaining: self.state.remaining,
            step: self.step(),
            total_steps: self.total_steps(),
        }
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("num_intervals", &self.intervals.len())
            .field("status", &self.status)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
