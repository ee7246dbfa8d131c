//! `tabata` - nested interval workout timer

use std::sync::{Arc, OnceLock};

use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

use tabata::cli::args::Cli;
use tabata::cli::commands;
use tabata::error::{ExitCode, ShutdownSignal};
use tabata::observability::{LoggingOptions, init_logging};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(ExitCode::for_usage(&e));
        }
    };

    if !cli.quiet {
        init_logging(LoggingOptions {
            format: cli.log_format,
            verbosity: cli.verbose,
            color: cli.color,
        });
    }

    let cancel = CancellationToken::new();
    let received: Arc<OnceLock<ShutdownSignal>> = Arc::new(OnceLock::new());

    // Registered before any work starts so an early signal is never lost
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

    // First signal stops playback cleanly, the second one forces exit
    let shutdown = cancel.clone();
    let first_signal = Arc::clone(&received);
    tokio::spawn(async move {
        let first = tokio::select! {
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigterm.recv() => ShutdownSignal::Terminate,
        };
        let _ = first_signal.set(first);

        eprintln!("\nStopping... (press Ctrl+C again to force)");
        shutdown.cancel();

        let second = tokio::select! {
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigterm.recv() => ShutdownSignal::Terminate,
        };
        std::process::exit(second.exit_code());
    });

    let result = commands::dispatch(cli, cancel).await;

    match result {
        Ok(()) => std::process::exit(received.get().map_or(ExitCode::SUCCESS, |s| s.exit_code())),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
