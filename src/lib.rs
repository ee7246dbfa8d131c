//! `tabata` - nested interval workout timer
//!
//! Workouts are trees of exercises and repeatable combos. This library
//! flattens a tree into its ordered work/rest intervals and plays them
//! back as a countdown driven by an external clock.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod playback;
pub mod workout;
