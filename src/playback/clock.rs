//! Wall-clock driver for a playback session.
//!
//! One task owns the [`PlaybackEngine`] and is its only writer. It waits on
//! three sources: caller commands, the cancellation token, and a ticker
//! that exists only while the engine is running. Each ticker is tagged
//! with the engine epoch it was armed under, and its ticks are delivered
//! through [`PlaybackEngine::tick_at`], so a tick that races a pause,
//! reset, or back is discarded instead of applied.
//!
//! Rendering state is published on a `watch` channel after every change.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::PlaybackError;
use crate::observability::{Event, EventEmitter};
use crate::workout::total_duration;

use super::engine::{PlaybackEngine, PlaybackView, TickOutcome};
use super::state::PlaybackStatus;

/// Default tick period: one second per countdown step.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// A caller request delivered to the driver task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start or resume.
    Start,
    /// Pause.
    Pause,
    /// Back to the first interval, clock stopped.
    Reset,
    /// Leave playback; the task exits.
    Back,
}

/// Driver settings.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Wall-clock time per countdown second.
    pub tick: Duration,
    /// Workout name reported in the event stream.
    pub workout_name: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            workout_name: String::new(),
        }
    }
}

/// Caller side of a running playback session.
#[derive(Debug)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<PlaybackView>,
    cancel: CancellationToken,
    task: JoinHandle<PlaybackView>,
}

impl PlaybackHandle {
    /// Spawns the driver task for `engine`.
    #[must_use]
    pub fn spawn(engine: PlaybackEngine, config: ClockConfig, events: Arc<EventEmitter>) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(engine.view());
        let cancel = CancellationToken::new();

        let driver = Driver {
            engine,
            tick: config.tick,
            events,
            view: view_tx,
        };
        emit_session_started(&driver, &config.workout_name);
        let task = tokio::spawn(driver.run(rx, cancel.clone()));

        Self {
            commands,
            view,
            cancel,
            task,
        }
    }

    /// Sends a command to the driver.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::SessionClosed` if the driver has exited.
    pub fn send(&self, command: Command) -> Result<(), PlaybackError> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::SessionClosed)
    }

    /// Starts or resumes the countdown.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::SessionClosed` if the driver has exited.
    pub fn start(&self) -> Result<(), PlaybackError> {
        self.send(Command::Start)
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::SessionClosed` if the driver has exited.
    pub fn pause(&self) -> Result<(), PlaybackError> {
        self.send(Command::Pause)
    }

    /// Returns to the first interval.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::SessionClosed` if the driver has exited.
    pub fn reset(&self) -> Result<(), PlaybackError> {
        self.send(Command::Reset)
    }

    /// Leaves playback. The driver stops after processing earlier commands.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::SessionClosed` if the driver has exited.
    pub fn back(&self) -> Result<(), PlaybackError> {
        self.send(Command::Back)
    }

    /// Stops the session immediately, skipping queued commands.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a token that cancels this session when triggered.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the latest published snapshot.
    #[must_use]
    pub fn view(&self) -> PlaybackView {
        self.view.borrow().clone()
    }

    /// Returns a receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackView> {
        self.view.clone()
    }

    /// Waits for the driver to exit and returns the final snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::TaskFailed` if the driver task panicked.
    pub async fn join(self) -> Result<PlaybackView, PlaybackError> {
        Ok(self.task.await?)
    }
}

fn emit_session_started(driver: &Driver, workout_name: &str) {
    let intervals = driver.engine.intervals();
    driver.events.emit(Event::SessionStarted {
        timestamp: Utc::now(),
        workout: workout_name.to_string(),
        total_steps: intervals.len(),
        total_seconds: total_duration(intervals),
    });
}

/// Ticker armed under a specific engine epoch.
struct Ticker {
    interval: Interval,
    epoch: u64,
}

impl Ticker {
    fn arm(period: Duration, epoch: u64) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, epoch }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> u64 {
    match ticker {
        Some(t) => {
            t.interval.tick().await;
            t.epoch
        }
        None => std::future::pending().await,
    }
}

struct Driver {
    engine: PlaybackEngine,
    tick: Duration,
    events: Arc<EventEmitter>,
    view: watch::Sender<PlaybackView>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        cancel: CancellationToken,
    ) -> PlaybackView {
        let mut ticker: Option<Ticker> = None;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("playback session cancelled by token");
                    self.leave();
                    break;
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("all playback handles dropped");
                        self.leave();
                        break;
                    };
                    if command == Command::Back {
                        self.leave();
                        break;
                    }
                    self.apply(command);
                }
                epoch = next_tick(&mut ticker) => {
                    self.deliver_tick(epoch);
                }
            }

            // Keep exactly one ticker alive per running epoch
            ticker = match ticker.take() {
                Some(t) if self.engine.is_running() && t.epoch == self.engine.epoch() => Some(t),
                _ if self.engine.is_running() => Some(Ticker::arm(self.tick, self.engine.epoch())),
                _ => None,
            };
            self.publish();
        }

        self.publish();
        self.engine.view()
    }

    fn apply(&mut self, command: Command) {
        let now = Utc::now();
        match command {
            Command::Start => {
                let resumed = self.engine.status() == PlaybackStatus::Paused;
                if !self.engine.start() {
                    return;
                }
                let state = self.engine.state();
                if resumed {
                    self.events.emit(Event::Resumed {
                        timestamp: now,
                        step: self.engine.step(),
                        remaining: state.remaining,
                    });
                } else {
                    self.emit_interval_started();
                }
            }
            Command::Pause => {
                if self.engine.pause() {
                    self.events.emit(Event::Paused {
                        timestamp: now,
                        step: self.engine.step(),
                        remaining: self.engine.state().remaining,
                    });
                }
            }
            Command::Reset => {
                self.engine.reset();
                self.events.emit(Event::Reset { timestamp: now });
            }
            Command::Back => self.leave(),
        }
    }

    fn deliver_tick(&mut self, epoch: u64) {
        match self.engine.tick_at(epoch) {
            TickOutcome::Advanced { .. } => self.emit_interval_started(),
            TickOutcome::Finished => {
                info!(steps = self.engine.total_steps(), "workout complete");
                self.events.emit(Event::Finished {
                    timestamp: Utc::now(),
                    total_steps: self.engine.total_steps(),
                });
            }
            TickOutcome::Counted { .. } | TickOutcome::Ignored => {}
        }
    }

    fn emit_interval_started(&self) {
        if let Some(current) = self.engine.current() {
            self.events.emit(Event::IntervalStarted {
                timestamp: Utc::now(),
                step: self.engine.step(),
                kind: current.kind,
                exercise_name: current.exercise_name.clone(),
                duration: current.duration,
            });
        }
    }

    fn leave(&mut self) {
        if self.engine.is_cancelled() {
            return;
        }
        self.engine.back();
        self.events.emit(Event::SessionCancelled {
            timestamp: Utc::now(),
            step: self.engine.step(),
        });
    }

    fn publish(&self) {
        let view = self.engine.view();
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}
