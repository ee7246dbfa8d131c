//! Error types for `Tabata`
//!
//! The flattener and the playback engine are total and never fail. Errors
//! only arise at the outer surfaces: loading workout files, validating
//! them, driving the async clock, and the CLI's own I/O.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `tabata` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Workout file error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Playback session error (session closed underneath the caller)
    pub const PLAYBACK_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;

    /// Exit code for an argument parsing outcome.
    ///
    /// `--help` and `--version` also arrive as clap errors but are not
    /// failures.
    #[must_use]
    pub fn for_usage(err: &clap::Error) -> i32 {
        if err.use_stderr() {
            Self::USAGE_ERROR
        } else {
            Self::SUCCESS
        }
    }
}

/// Signal that asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT (Ctrl+C)
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl ShutdownSignal {
    /// Returns the conventional exit code for this signal.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Interrupt => ExitCode::INTERRUPTED,
            Self::Terminate => ExitCode::TERMINATED,
        }
    }
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `Tabata` operations.
///
/// Aggregates the domain-specific errors and maps each to an exit code.
#[derive(Debug, Error)]
pub enum TabataError {
    /// Workout file loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Playback session error
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TabataError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Playback(_) => ExitCode::PLAYBACK_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Workout file loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the workout file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Workout validation failed
    #[error("validation failed for {path}: {}", summarize(.errors))]
    ValidationError {
        /// Path to the workout file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Workout file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in the workout file is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message or location supplied with the reference
        location: String,
    },
}

fn summarize(errors: &[ValidationIssue]) -> String {
    match errors {
        [] => "no issues".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while validating a workout.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic node (e.g., `"items[1].children[0].repetitions"`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - prevents the workout from being played
    Error,
    /// Warning - worth surfacing, does not prevent playback
    Warning,
}

// ============================================================================
// Playback Errors
// ============================================================================

/// Errors raised by the async clock driver.
///
/// The synchronous [`PlaybackEngine`](crate::playback::PlaybackEngine) has no
/// failure path; these only describe a session that went away under its
/// handle.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The driver task has stopped and no longer accepts commands
    #[error("playback session closed")]
    SessionClosed,

    /// The driver task panicked or was aborted
    #[error("playback task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for PlaybackError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}
