//! `run` command
//!
//! Plays a workout in the terminal. One countdown line is printed per
//! change; single-letter lines on stdin control the clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::cli::args::RunArgs;
use crate::error::TabataError;
use crate::observability::EventEmitter;
use crate::playback::{
    ClockConfig, Command, PlaybackEngine, PlaybackHandle, PlaybackStatus, PlaybackView,
    format_clock,
};

use super::load_workout;
use super::plan::EMPTY_MESSAGE;

/// Message shown once the last interval has counted down.
pub const DONE_MESSAGE: &str = "Done!";

/// Maps one stdin line to a playback command.
///
/// `p` pauses, `s` starts or resumes, `r` resets, `q` leaves.
#[must_use]
pub fn parse_key(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(Command::Pause),
        "s" | "start" => Some(Command::Start),
        "r" | "reset" => Some(Command::Reset),
        "q" | "quit" | "back" => Some(Command::Back),
        _ => None,
    }
}

/// Renders a snapshot as one countdown line.
#[must_use]
pub fn render_view(view: &PlaybackView) -> String {
    let kind = view.kind.map_or("", |k| k.label());
    let name = view.exercise_name.as_deref().unwrap_or_default();
    let mut line = format!(
        "[{}/{}] {kind:<4} {:>5}  {name}",
        view.step,
        view.total_steps,
        format_clock(view.remaining)
    );
    match view.status {
        PlaybackStatus::Paused => line.push_str("  (paused)"),
        PlaybackStatus::Idle => line.push_str("  (press s to start)"),
        PlaybackStatus::Empty
        | PlaybackStatus::Running
        | PlaybackStatus::Finished
        | PlaybackStatus::Cancelled => {}
    }
    line
}

/// Play a workout file.
///
/// # Errors
///
/// Returns a config error if the file fails to load, an I/O error if the
/// events file or stdin fails, or a playback error if the driver task
/// dies.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), TabataError> {
    let workout = load_workout(&args.file)?;
    let engine = PlaybackEngine::new(workout.intervals());

    if engine.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return Ok(());
    }

    let events = match &args.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };
    let config = ClockConfig {
        tick: Duration::from_millis(args.tick_ms),
        workout_name: workout.display_name().to_string(),
    };
    let handle = PlaybackHandle::spawn(engine, config, Arc::new(events));
    let mut views = handle.subscribe();

    println!("{}", render_view(&views.borrow_and_update()));
    let mut last_sent = None;
    if args.autostart {
        handle.start()?;
        last_sent = Some(Command::Start);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut last_line = String::new();

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("interrupted, leaving playback");
                handle.cancel();
                break;
            }
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => match parse_key(&line) {
                        Some(Command::Back) => {
                            handle.back()?;
                            break;
                        }
                        Some(command) => {
                            handle.send(command)?;
                            last_sent = Some(command);
                        }
                        None => tracing::debug!(input = %line.trim(), "ignoring unknown key"),
                    },
                    None => {
                        // Without input only a started clock can make progress
                        input_open = false;
                        if last_sent != Some(Command::Start) {
                            tracing::debug!("stdin closed while stopped, leaving playback");
                            handle.back()?;
                            break;
                        }
                    }
                }
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if view.is_finished() {
                    println!("{DONE_MESSAGE}");
                    handle.back()?;
                    break;
                }
                let rendered = render_view(&view);
                if rendered != last_line {
                    println!("{rendered}");
                    last_line = rendered;
                }
            }
        }
    }

    let last = handle.join().await?;
    tracing::info!(status = %last.status, step = last.step, "playback ended");
    Ok(())
}
