//! Command-line interface
//!
//! Argument definitions live in [`args`]; each subcommand's handler lives
//! in [`commands`].

pub mod args;
pub mod commands;
