//! Workout tree types
//!
//! A workout is an ordered list of [`WorkoutNode`]s. Each node owns its
//! children outright, so the tree is acyclic and finite by construction.

use serde::{Deserialize, Serialize};

/// Default work duration for a freshly added exercise, in seconds.
pub const DEFAULT_WORK_SECS: u32 = 20;

/// Default rest duration for a freshly added exercise, in seconds.
pub const DEFAULT_REST_SECS: u32 = 10;

/// Default name for a freshly added combo.
pub const DEFAULT_COMBO_NAME: &str = "New Combo";

/// Generates a fresh opaque node identifier.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

const fn one() -> u32 {
    1
}

/// A node in the workout tree.
///
/// Serialized with a `type` tag of `exercise` or `combo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkoutNode {
    /// A single timed exercise.
    Exercise(Exercise),
    /// A repeatable group of nodes.
    Combo(Combo),
}

impl WorkoutNode {
    /// Returns the node identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Exercise(e) => &e.id,
            Self::Combo(c) => &c.id,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exercise(e) => &e.name,
            Self::Combo(c) => &c.name,
        }
    }

    /// Returns the repetition count.
    #[must_use]
    pub const fn repetitions(&self) -> u32 {
        match self {
            Self::Exercise(e) => e.repetitions,
            Self::Combo(c) => c.repetitions,
        }
    }

    /// Returns `true` if this node is a combo.
    #[must_use]
    pub const fn is_combo(&self) -> bool {
        matches!(self, Self::Combo(_))
    }
}

impl From<Exercise> for WorkoutNode {
    fn from(exercise: Exercise) -> Self {
        Self::Exercise(exercise)
    }
}

impl From<Combo> for WorkoutNode {
    fn from(combo: Combo) -> Self {
        Self::Combo(combo)
    }
}

/// A timed exercise: `duration` seconds of work, optionally followed by
/// `rest` seconds of rest, repeated `repetitions` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Exercise {
    /// Opaque identifier, unique within a tree. Generated when omitted.
    #[serde(default = "new_id")]
    pub id: String,

    /// Display name. May be empty while editing.
    #[serde(default)]
    pub name: String,

    /// Work duration in whole seconds.
    #[serde(with = "seconds")]
    pub duration: u32,

    /// Rest duration in whole seconds. Zero means no rest interval.
    #[serde(default, with = "seconds")]
    pub rest: u32,

    /// Repetition count.
    #[serde(default = "one")]
    pub repetitions: u32,
}

impl Exercise {
    /// Creates an exercise with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: u32, rest: u32, repetitions: u32) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            duration,
            rest,
            repetitions,
        }
    }

    /// Creates the exercise the builder adds by default: unnamed, 20s of
    /// work, 10s of rest, once.
    #[must_use]
    pub fn new_default() -> Self {
        Self::new("", DEFAULT_WORK_SECS, DEFAULT_REST_SECS, 1)
    }
}

/// A repeatable group of child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Combo {
    /// Opaque identifier, unique within a tree. Generated when omitted.
    #[serde(default = "new_id")]
    pub id: String,

    /// Display name. Not carried into the flattened sequence.
    #[serde(default)]
    pub name: String,

    /// Repetition count.
    #[serde(default = "one")]
    pub repetitions: u32,

    /// Ordered children; may contain further combos.
    #[serde(default)]
    pub children: Vec<WorkoutNode>,
}

impl Combo {
    /// Creates a combo with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, repetitions: u32, children: Vec<WorkoutNode>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            repetitions,
            children,
        }
    }

    /// Creates the empty combo the builder adds by default.
    #[must_use]
    pub fn new_default() -> Self {
        Self::new(DEFAULT_COMBO_NAME, 1, Vec::new())
    }
}

/// Serde support for whole-second durations.
///
/// Accepts a non-negative integer (`45`) or a `humantime` string
/// (`"45s"`, `"1m 30s"`). Sub-second precision is rejected. Always
/// serializes as an integer.
pub mod seconds {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    /// Parses a duration string into whole seconds.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the string is not a valid
    /// `humantime` duration, carries a fractional second, or overflows `u32`.
    pub fn parse(s: &str) -> Result<u32, String> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            return Ok(n);
        }
        let duration =
            humantime::parse_duration(s).map_err(|e| format!("invalid duration '{s}': {e}"))?;
        if duration.subsec_nanos() != 0 {
            return Err(format!("duration '{s}' must be a whole number of seconds"));
        }
        u32::try_from(duration.as_secs()).map_err(|_| format!("duration '{s}' is too large"))
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        deserializer.deserialize_any(SecondsVisitor)
    }

    struct SecondsVisitor;

    impl Visitor<'_> for SecondsVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("whole seconds as an integer or a duration string like \"45s\"")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("duration {v} is too large")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("duration {v} must be non-negative")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            parse(v).map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exercise() {
        let e = Exercise::new_default();
        assert!(e.name.is_empty());
        assert_eq!(e.duration, 20);
        assert_eq!(e.rest, 10);
        assert_eq!(e.repetitions, 1);
        assert!(!e.id.is_empty());
    }

    #[test]
    fn test_default_combo() {
        let c = Combo::new_default();
        assert_eq!(c.name, "New Combo");
        assert_eq!(c.repetitions, 1);
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_fresh_ids_are_distinct() {
        assert_ne!(Exercise::new_default().id, Exercise::new_default().id);
    }

    #[test]
    fn test_deserialize_tagged_nodes() {
        let yaml = r"
- type: exercise
  id: ex-1
  name: Burpees
  duration: 20
  rest: 10s
  repetitions: 2
- type: combo
  id: combo-1
  name: Core
  repetitions: 3
  children:
    - type: exercise
      name: Plank
      duration: 1m
";
        let nodes: Vec<WorkoutNode> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(nodes.len(), 2);

        let WorkoutNode::Exercise(burpees) = &nodes[0] else {
            panic!("expected exercise");
        };
        assert_eq!(burpees.id, "ex-1");
        assert_eq!(burpees.rest, 10);
        assert_eq!(burpees.repetitions, 2);

        let WorkoutNode::Combo(core) = &nodes[1] else {
            panic!("expected combo");
        };
        assert_eq!(core.repetitions, 3);
        let WorkoutNode::Exercise(plank) = &core.children[0] else {
            panic!("expected exercise");
        };
        assert_eq!(plank.duration, 60);
        assert_eq!(plank.rest, 0);
        assert_eq!(plank.repetitions, 1);
        assert!(!plank.id.is_empty(), "missing id should be generated");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let yaml = "- type: warmup\n  duration: 10\n";
        assert!(serde_yaml::from_str::<Vec<WorkoutNode>>(yaml).is_err());
    }

    #[test]
    fn test_seconds_parse() {
        assert_eq!(seconds::parse("45").unwrap(), 45);
        assert_eq!(seconds::parse("45s").unwrap(), 45);
        assert_eq!(seconds::parse("1m 30s").unwrap(), 90);
        assert!(seconds::parse("1500ms").is_err());
        assert!(seconds::parse("soon").is_err());
    }

    #[test]
    fn test_seconds_rejects_negative() {
        let negative = seconds::deserialize(serde_yaml::Deserializer::from_str("-5"));
        assert!(negative.is_err());
        let positive = seconds::deserialize(serde_yaml::Deserializer::from_str("5"));
        assert_eq!(positive.unwrap(), 5);
    }

    #[test]
    fn test_serializes_durations_as_integers() {
        let node = WorkoutNode::Exercise(Exercise {
            id: "a".to_string(),
            name: "Squats".to_string(),
            duration: 90,
            rest: 0,
            repetitions: 1,
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "exercise");
        assert_eq!(json["duration"], 90);
    }
}
