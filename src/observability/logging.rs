//! Logging initialization for `tabata`.
//!
//! Logs go to stderr so they never mix with the countdown display or
//! `--format json` output on stdout. `TABATA_LOG_LEVEL` overrides the
//! verbosity flags.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable that overrides the verbosity-derived filter.
pub const LOG_LEVEL_ENV: &str = "TABATA_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// Everything needed to install the global subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOptions {
    /// Output format.
    pub format: LogFormat,
    /// Count of `-v` flags.
    pub verbosity: u8,
    /// Color preference.
    pub color: ColorChoice,
}

/// Maps a `-v` count to a tracing directive: warn, info, debug, then
/// trace for three or more.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Decides whether to emit ANSI escapes on stderr.
///
/// `Auto` colors only a terminal, and `NO_COLOR` wins over `Auto`.
#[must_use]
pub fn use_ansi(color: ColorChoice, stderr_is_terminal: bool, no_color_set: bool) -> bool {
    match color {
        ColorChoice::Auto => stderr_is_terminal && !no_color_set,
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global tracing subscriber.
///
/// Uses `try_init()`, so repeated calls (tests, embedding) are harmless.
pub fn init_logging(options: LoggingOptions) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(options.verbosity)));
    let show_target = options.verbosity >= 2;

    match options.format {
        LogFormat::Human => {
            let ansi = use_ansi(
                options.color,
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            );
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(u8::MAX), "trace");
    }

    #[test]
    fn ansi_auto_follows_terminal_and_no_color() {
        assert!(use_ansi(ColorChoice::Auto, true, false));
        assert!(!use_ansi(ColorChoice::Auto, false, false));
        assert!(!use_ansi(ColorChoice::Auto, true, true));
    }

    #[test]
    fn ansi_explicit_choices_ignore_environment() {
        assert!(use_ansi(ColorChoice::Always, false, true));
        assert!(!use_ansi(ColorChoice::Never, true, false));
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(LoggingOptions::default());
        init_logging(LoggingOptions {
            format: LogFormat::Json,
            verbosity: 3,
            color: ColorChoice::Never,
        });
    }
}
