//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod plan;
pub mod run;
pub mod validate;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLoader, WorkoutFile};
use crate::error::TabataError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `cancel` fires on the first SIGINT/SIGTERM; only `run` listens to it.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), TabataError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cancel).await,
        Commands::Plan(args) => plan::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads a workout with default limits, logging any load warnings.
fn load_workout(path: &Path) -> Result<Arc<WorkoutFile>, TabataError> {
    tracing::info!(file = %path.display(), "loading workout");
    let result = ConfigLoader::with_defaults().load(path)?;

    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    Ok(result.config)
}
