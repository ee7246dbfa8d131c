//! Workout validation
//!
//! Runs on the fully deserialized [`WorkoutFile`] and collects every issue
//! instead of stopping at the first, so a user can fix a file in one pass.

use std::collections::HashSet;

use crate::config::loader::ConfigLimits;
use crate::config::schema::WorkoutFile;
use crate::error::{Severity, ValidationIssue};
use crate::workout::{WorkoutNode, interval_count};

// ============================================================================
// Public API
// ============================================================================

/// Result of workout validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent playback).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Workout validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
    seen_ids: HashSet<String>,
    node_count: usize,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a workout and returns every error and warning found.
    pub fn validate(&mut self, file: &WorkoutFile, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();
        self.seen_ids.clear();
        self.node_count = 0;

        if file.items.is_empty() {
            self.warn("items", "workout has no exercises");
        }

        self.validate_nodes(&file.items, "items", 1, limits);

        if self.node_count > limits.max_nodes {
            self.error(
                "items",
                format!(
                    "workout has {} nodes, more than the limit of {}",
                    self.node_count, limits.max_nodes
                ),
            );
        }

        let intervals = interval_count(&file.items);
        if intervals > limits.max_intervals {
            self.error(
                "items",
                format!(
                    "workout expands to {intervals} intervals, more than the limit of {}",
                    limits.max_intervals
                ),
            );
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_nodes(
        &mut self,
        nodes: &[WorkoutNode],
        parent_path: &str,
        depth: usize,
        limits: &ConfigLimits,
    ) {
        for (i, node) in nodes.iter().enumerate() {
            let path = format!("{parent_path}[{i}]");
            self.node_count += 1;

            if node.id().trim().is_empty() {
                self.error(&format!("{path}.id"), "id must not be empty");
            } else if !self.seen_ids.insert(node.id().to_string()) {
                self.error(&format!("{path}.id"), format!("duplicate id '{}'", node.id()));
            }

            if node.repetitions() == 0 {
                self.error(
                    &format!("{path}.repetitions"),
                    "repetitions must be at least 1",
                );
            }

            match node {
                WorkoutNode::Exercise(exercise) => {
                    if exercise.duration == 0 {
                        self.error(
                            &format!("{path}.duration"),
                            "duration must be at least 1 second",
                        );
                    }
                    if exercise.name.trim().is_empty() {
                        self.warn(&format!("{path}.name"), "exercise has no name");
                    }
                }
                WorkoutNode::Combo(combo) => {
                    if combo.children.is_empty() {
                        self.warn(
                            &format!("{path}.children"),
                            "combo has no children and will be skipped",
                        );
                    }
                    if depth >= limits.max_depth && !combo.children.is_empty() {
                        self.error(
                            &format!("{path}.children"),
                            format!("combo nesting exceeds the limit of {}", limits.max_depth),
                        );
                    } else {
                        self.validate_nodes(
                            &combo.children,
                            &format!("{path}.children"),
                            depth + 1,
                            limits,
                        );
                    }
                }
            }
        }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Combo, Exercise};

    fn limits() -> ConfigLimits {
        ConfigLimits {
            max_depth: 3,
            max_nodes: 50,
            max_intervals: 1000,
            max_config_size: 1024 * 1024,
        }
    }

    fn file(items: Vec<WorkoutNode>) -> WorkoutFile {
        WorkoutFile {
            workout: crate::config::schema::WorkoutMetadata::default(),
            items,
        }
    }

    fn validate(items: Vec<WorkoutNode>) -> ValidationResult {
        Validator::new().validate(&file(items), &limits())
    }

    fn paths(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_valid_workout() {
        let result = validate(vec![
            Exercise::new("Burpees", 20, 10, 2).into(),
            Combo::new("Core", 2, vec![Exercise::new("Plank", 30, 0, 1).into()]).into(),
        ]);
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_workout_warns() {
        let result = validate(vec![]);
        assert!(result.is_valid());
        assert_eq!(paths(&result.warnings), ["items"]);
    }

    #[test]
    fn test_zero_repetitions_and_duration() {
        let result = validate(vec![
            Exercise::new("A", 0, 0, 0).into(),
            Combo::new("C", 0, vec![Exercise::new("B", 10, 0, 1).into()]).into(),
        ]);
        assert_eq!(
            paths(&result.errors),
            ["items[0].repetitions", "items[0].duration", "items[1].repetitions"]
        );
    }

    #[test]
    fn test_duplicate_ids_collected() {
        let mut a = Exercise::new("A", 10, 0, 1);
        a.id = "same".to_string();
        let mut b = Exercise::new("B", 10, 0, 1);
        b.id = "same".to_string();
        let result = validate(vec![
            a.into(),
            Combo::new("C", 1, vec![b.into()]).into(),
        ]);
        assert_eq!(paths(&result.errors), ["items[1].children[0].id"]);
        assert!(result.errors[0].message.contains("duplicate id 'same'"));
    }

    #[test]
    fn test_unnamed_exercise_and_empty_combo_warn() {
        let result = validate(vec![
            Exercise::new_default().into(),
            Combo::new_default().into(),
        ]);
        assert!(result.is_valid());
        assert_eq!(paths(&result.warnings), ["items[0].name", "items[1].children"]);
    }

    #[test]
    fn test_depth_limit() {
        let mut node: WorkoutNode = Exercise::new("deep", 5, 0, 1).into();
        for _ in 0..4 {
            node = Combo::new("wrap", 1, vec![node]).into();
        }
        let result = validate(vec![node]);
        assert!(result.has_errors());
        assert!(
            result.errors[0].message.contains("nesting exceeds the limit of 3"),
            "{:?}",
            result.errors
        );
    }

    #[test]
    fn test_interval_limit() {
        let result = validate(vec![
            Combo::new("big", 1000, vec![Exercise::new("A", 1, 1, 1).into()]).into(),
        ]);
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.message.contains("expands to 2000 intervals"))
        );
    }

    #[test]
    fn test_validator_is_reusable() {
        let mut validator = Validator::new();
        let bad = file(vec![Exercise::new("A", 0, 0, 1).into()]);
        let good = file(vec![Exercise::new("A", 5, 0, 1).into()]);
        assert!(validator.validate(&bad, &limits()).has_errors());
        assert!(validator.validate(&good, &limits()).is_valid());
    }
}
