//! Sequence flattening
//!
//! Turns a nested workout tree into the flat, ordered list of timed
//! intervals that playback walks through. Depth-first, left-to-right;
//! repetition counts compose multiplicatively across nesting levels.

use serde::Serialize;

use super::node::WorkoutNode;

/// Whether an interval is work or rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// Exercise time.
    Work,
    /// Recovery time following an exercise.
    Rest,
}

impl IntervalKind {
    /// Returns the display label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Rest => "Rest",
        }
    }
}

impl std::fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// One step of a flattened workout.
///
/// `duration` is always at least one second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedInterval {
    /// Work or rest.
    pub kind: IntervalKind,
    /// Length in whole seconds.
    pub duration: u32,
    /// Name of the exercise this interval came from.
    pub exercise_name: String,
}

impl TimedInterval {
    /// Creates a work interval.
    #[must_use]
    pub fn work(duration: u32, exercise_name: impl Into<String>) -> Self {
        Self {
            kind: IntervalKind::Work,
            duration,
            exercise_name: exercise_name.into(),
        }
    }

    /// Creates a rest interval.
    #[must_use]
    pub fn rest(duration: u32, exercise_name: impl Into<String>) -> Self {
        Self {
            kind: IntervalKind::Rest,
            duration,
            exercise_name: exercise_name.into(),
        }
    }

    /// Returns `true` for a rest interval.
    #[must_use]
    pub const fn is_rest(&self) -> bool {
        matches!(self.kind, IntervalKind::Rest)
    }
}

/// Flattens a workout tree into its ordered interval sequence.
///
/// Never fails. An empty tree, an empty combo, or a node with zero
/// repetitions contributes nothing. Intervals of zero seconds are never
/// emitted: a zero rest is skipped, and so is a zero work duration on a
/// tree that bypassed validation.
#[must_use]
pub fn flatten(nodes: &[WorkoutNode]) -> Vec<TimedInterval> {
    let mut out = Vec::new();
    flatten_into(nodes, &mut out);
    out
}

fn flatten_into(nodes: &[WorkoutNode], out: &mut Vec<TimedInterval>) {
    for node in nodes {
        match node {
            WorkoutNode::Exercise(exercise) => {
                if exercise.duration == 0 && exercise.rest == 0 {
                    continue;
                }
                for _ in 0..exercise.repetitions {
                    if exercise.duration > 0 {
                        out.push(TimedInterval::work(exercise.duration, &exercise.name));
                    }
                    if exercise.rest > 0 {
                        out.push(TimedInterval::rest(exercise.rest, &exercise.name));
                    }
                }
            }
            WorkoutNode::Combo(combo) => {
                if combo.repetitions == 0 {
                    continue;
                }
                let start = out.len();
                flatten_into(&combo.children, out);
                let end = out.len();
                // Nothing to repeat
                if start == end {
                    continue;
                }
                for _ in 1..combo.repetitions {
                    out.extend_from_within(start..end);
                }
            }
        }
    }
}

/// Counts the intervals [`flatten`] would produce, without building them.
///
/// Saturates at `u64::MAX`, so it is safe to call on a tree whose
/// expansion would not fit in memory.
#[must_use]
pub fn interval_count(nodes: &[WorkoutNode]) -> u64 {
    nodes.iter().fold(0u64, |acc, node| {
        let per_repetition = match node {
            WorkoutNode::Exercise(exercise) => {
                u64::from(exercise.duration > 0) + u64::from(exercise.rest > 0)
            }
            WorkoutNode::Combo(combo) => interval_count(&combo.children),
        };
        acc.saturating_add(per_repetition.saturating_mul(u64::from(node.repetitions())))
    })
}

/// Total length of an interval sequence in seconds.
#[must_use]
pub fn total_duration(intervals: &[TimedInterval]) -> u64 {
    intervals.iter().map(|i| u64::from(i.duration)).sum()
}
