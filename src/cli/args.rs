//! CLI argument definitions
//!
//! All Clap derive structs for `tabata` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Nested interval workout timer.
#[derive(Parser, Debug)]
#[command(name = "tabata", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TABATA_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(
        long,
        default_value = "human",
        global = true,
        env = "TABATA_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a workout as a countdown in the terminal.
    Run(RunArgs),

    /// Print the flattened interval sequence of a workout.
    Plan(PlanArgs),

    /// Validate workout files without playing them.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML workout file.
    #[arg(env = "TABATA_WORKOUT")]
    pub file: PathBuf,

    /// Start the countdown immediately instead of waiting for `s`.
    #[arg(long)]
    pub autostart: bool,

    /// Milliseconds of wall-clock time per countdown second.
    #[arg(long, default_value_t = 1000, hide = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Write playback events as JSONL to this file.
    #[arg(long, env = "TABATA_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Arguments for `plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the YAML workout file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Workout files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["tabata", "run", "hiit.yaml"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected RunArgs");
        };
        assert_eq!(args.file, PathBuf::from("hiit.yaml"));
        assert!(!args.autostart);
        assert_eq!(args.tick_ms, 1000);
        assert!(args.events_file.is_none());
    }

    #[test]
    fn test_run_rejects_zero_tick() {
        let cli = Cli::try_parse_from(["tabata", "run", "hiit.yaml", "--tick-ms", "0"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_validate_requires_files() {
        let cli = Cli::try_parse_from(["tabata", "validate"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["tabata", "validate", "a.yaml", "b.yaml", "--strict"])
            .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("Expected ValidateArgs");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.strict);
    }

    #[test]
    fn test_plan_json_format() {
        let cli = Cli::try_parse_from(["tabata", "plan", "w.yaml", "--format", "json"]).unwrap();
        let Commands::Plan(args) = cli.command else {
            panic!("Expected PlanArgs");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tabata", "plan", "w.yaml", "-vv", "--color", "never"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["tabata", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["tabata", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
