//! Workout files
//!
//! Loads and validates YAML workout definitions.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::{WorkoutFile, WorkoutMetadata};
pub use validation::{ValidationResult, Validator};
