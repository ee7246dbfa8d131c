//! Shared integration-test harness for running the `tabata` binary as a
//! child process.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};

/// Helpers for invoking the compiled `tabata` binary.
pub struct TabataProcess;

impl TabataProcess {
    fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tabata"));
        cmd.args(args)
            .env_remove("TABATA_LOG_LEVEL")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Runs `tabata` with the given arguments and empty stdin.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::command(args)
            .stdin(Stdio::null())
            .output()
            .expect("failed to run tabata")
    }

    /// Runs `tabata`, writes `input` to its stdin, then closes stdin.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_with_input(args: &[&str], input: &str) -> Output {
        let mut child = Self::command(args)
            .stdin(Stdio::piped())
            .spawn()
            .expect("failed to spawn tabata");
        child
            .stdin
            .take()
            .expect("stdin not captured")
            .write_all(input.as_bytes())
            .expect("failed to write stdin");
        child.wait_with_output().expect("failed to wait for tabata")
    }

    /// Spawns `tabata` with stdin held open and waits for its first stdout
    /// line, so the process is known to be past startup.
    ///
    /// Returns the child and that first line.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_interactive(args: &[&str]) -> (Child, String) {
        let mut child = Self::command(args)
            .stdin(Stdio::piped())
            .spawn()
            .expect("failed to spawn tabata");
        let stdout = child.stdout.take().expect("stdout not captured");
        let mut first = String::new();
        BufReader::new(stdout)
            .read_line(&mut first)
            .expect("failed to read first line");
        (child, first)
    }

    /// Sends a Unix signal (`"INT"`, `"TERM"`) to a running child.
    #[allow(clippy::missing_panics_doc)]
    pub fn send_signal(child: &Child, signal: &str) {
        let status = Command::new("kill")
            .args([&format!("-{signal}"), &child.id().to_string()])
            .status()
            .expect("failed to run kill");
        assert!(status.success(), "kill -{signal} failed");
    }

    /// Returns the absolute path to a test fixture file.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Same as [`fixture_path`](Self::fixture_path) as an owned string.
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name).to_string_lossy().into_owned()
    }
}
