//! `plan` command
//!
//! Prints the flattened interval sequence without playing it.

use std::time::Duration;

use serde_json::json;

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::error::TabataError;
use crate::playback::format_clock;
use crate::workout::{TimedInterval, total_duration};

use super::load_workout;

/// Message shown for a workout with nothing to play.
pub const EMPTY_MESSAGE: &str = "No exercises configured!";

/// Print the interval plan for a workout file.
///
/// # Errors
///
/// Returns a config error if the file fails to load, or a JSON error if
/// serialization fails.
pub fn run(args: &PlanArgs) -> Result<(), TabataError> {
    let workout = load_workout(&args.file)?;
    let intervals = workout.intervals();
    let total = total_duration(&intervals);

    match args.format {
        OutputFormat::Human => {
            if intervals.is_empty() {
                println!("{EMPTY_MESSAGE}");
                return Ok(());
            }
            println!(
                "{}: {} intervals, {} total",
                workout.display_name(),
                intervals.len(),
                humantime::format_duration(Duration::from_secs(total))
            );
            for (i, interval) in intervals.iter().enumerate() {
                println!("{}", render_line(i + 1, interval));
            }
        }
        OutputFormat::Json => {
            let doc = json!({
                "workout": workout.display_name(),
                "total_steps": intervals.len(),
                "total_seconds": total,
                "intervals": intervals,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn render_line(step: usize, interval: &TimedInterval) -> String {
    format!(
        "{step:>4}. {:<4} {:>5}  {}",
        interval.kind,
        format_clock(interval.duration),
        interval.exercise_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line() {
        assert_eq!(
            render_line(3, &TimedInterval::rest(75, "Burpees")),
            "   3. Rest  1:15  Burpees"
        );
        assert_eq!(
            render_line(12, &TimedInterval::work(20, "Squats")),
            "  12. Work    20  Squats"
        );
    }
}
