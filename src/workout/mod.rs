//! Workout model and sequence flattening
//!
//! - [`WorkoutNode`] - the nested tree of exercises and combos
//! - [`flatten`] - tree → ordered [`TimedInterval`] list
//! - [`edit`] - pure whole-tree edit helpers

pub mod edit;
pub mod flatten;
pub mod node;

pub use edit::{find_node, remove_node, replace_node};
pub use flatten::{IntervalKind, TimedInterval, flatten, interval_count, total_duration};
pub use node::{Combo, Exercise, WorkoutNode};
