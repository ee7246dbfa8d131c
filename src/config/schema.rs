//! Workout file schema
//!
//! The YAML document a workout is loaded from:
//!
//! ```yaml
//! workout:
//!   name: Morning HIIT
//! items:
//!   - type: exercise
//!     name: Burpees
//!     duration: 20s
//!     rest: 10s
//!     repetitions: 2
//!   - type: combo
//!     name: Core
//!     repetitions: 3
//!     children:
//!       - type: exercise
//!         name: Plank
//!         duration: 30
//! ```

use serde::{Deserialize, Serialize};

use crate::workout::{TimedInterval, WorkoutNode, flatten};

/// Root of a workout file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct WorkoutFile {
    /// Workout metadata.
    #[serde(default)]
    pub workout: WorkoutMetadata,

    /// Top-level nodes, played in order.
    #[serde(default)]
    pub items: Vec<WorkoutNode>,
}

impl WorkoutFile {
    /// Flattens the items into a fresh interval sequence.
    #[must_use]
    pub fn intervals(&self) -> Vec<TimedInterval> {
        flatten(&self.items)
    }

    /// Returns the workout name, or `"Tabata"` when unnamed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.workout.name.trim().is_empty() {
            "Tabata"
        } else {
            &self.workout.name
        }
    }
}

/// Descriptive workout metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct WorkoutMetadata {
    /// Workout name.
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file() {
        let file: WorkoutFile = serde_yaml::from_str("items: []\n").unwrap();
        assert!(file.items.is_empty());
        assert_eq!(file.display_name(), "Tabata");
    }

    #[test]
    fn test_unknown_top_level_field_rejected() {
        let err = serde_yaml::from_str::<WorkoutFile>("itemz: []\n").unwrap_err();
        assert!(err.to_string().contains("itemz"), "{err}");
    }

    #[test]
    fn test_intervals_flatten_items() {
        let yaml = r"
workout:
  name: Quick
items:
  - type: exercise
    name: Jumping Jacks
    duration: 20
    rest: 10
    repetitions: 2
";
        let file: WorkoutFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.display_name(), "Quick");
        assert_eq!(file.intervals().len(), 4);
    }
}
