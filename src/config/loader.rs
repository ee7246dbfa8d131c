//! Workout file loader
//!
//! Loading runs as a fixed pipeline:
//! 1. Size check against [`ConfigLimits::max_config_size`]
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing
//! 4. Deserialization to [`WorkoutFile`]
//! 5. Validation
//! 6. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Value;

use crate::config::schema::WorkoutFile;
use crate::config::validation::Validator;
use crate::error::ConfigError;

/// Source label used when loading from an in-memory string.
const INLINE_SOURCE: &str = "<inline>";

// ============================================================================
// Public API
// ============================================================================

/// Options for the workout loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for workout size.
    pub config_limits: ConfigLimits,
}

/// Limits that keep a hostile or mistaken workout file from exhausting
/// memory when it is flattened.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum combo nesting depth.
    pub max_depth: usize,

    /// Maximum number of nodes (exercises plus combos).
    pub max_nodes: usize,

    /// Maximum number of intervals the workout may expand to.
    pub max_intervals: u64,

    /// Maximum workout file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_depth: env_or("TABATA_MAX_DEPTH", 16),
            max_nodes: env_or("TABATA_MAX_NODES", 1000),
            max_intervals: env_or("TABATA_MAX_INTERVALS", 100_000),
            max_config_size: env_or("TABATA_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a workout file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated workout.
    pub config: Arc<WorkoutFile>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during workout loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Workout loader.
///
/// Handles the full pipeline from YAML file to frozen [`WorkoutFile`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Returns the limits this loader enforces.
    #[must_use]
    pub const fn limits(&self) -> &ConfigLimits {
        &self.options.config_limits
    }

    /// Loads a workout file and returns the frozen workout.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or is larger than the size limit
    /// - A required environment variable is unset
    /// - YAML parsing or deserialization fails
    /// - Validation finds errors
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let max = self.options.config_limits.max_config_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max {
            return Err(size_error(file_size, max));
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), bytes = raw.len(), "loading workout");
        self.load_source(&raw, path)
    }

    /// Loads a workout from an in-memory YAML string.
    ///
    /// Runs the same pipeline as [`load`](Self::load) minus the file read.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), except for [`ConfigError::MissingFile`].
    pub fn load_from_str(&self, raw: &str) -> Result<LoadResult, ConfigError> {
        let max = self.options.config_limits.max_config_size;
        if raw.len() > max {
            return Err(size_error(raw.len(), max));
        }
        self.load_source(raw, Path::new(INLINE_SOURCE))
    }

    fn load_source(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        // Stage 1: environment variable substitution
        let mut env_sub = EnvSubstitution::new();
        let substituted = env_sub.substitute(raw, path)?;
        warnings.extend(env_sub.warnings);

        // Stage 2: YAML parsing
        let root: Value = serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        if root.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Workout file is empty".to_string(),
            });
        }

        // Stage 3: typed deserialization
        let workout: WorkoutFile =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("Failed to deserialize workout: {e}"),
            })?;

        // Stage 4: validation
        let mut validator = Validator::new();
        let validation = validator.validate(&workout, &self.options.config_limits);

        if validation.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: validation.errors,
            });
        }

        warnings.extend(validation.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        tracing::debug!(
            items = workout.items.len(),
            warnings = warnings.len(),
            "workout loaded"
        );

        // Stage 5: freeze
        Ok(LoadResult {
            config: Arc::new(workout),
            warnings,
        })
    }
}

fn size_error(size: usize, max: usize) -> ConfigError {
    ConfigError::InvalidValue {
        field: "file_size".to_string(),
        value: format!("{size} bytes"),
        expected: format!("at most {max} bytes"),
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text so substituted numbers keep their YAML type.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - value, or empty string with a warning if unset
    /// - `${VAR:-default}` - default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str, source_path: &Path) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let spec = Self::parse_var_spec(&mut chars, source_path)?;
                    self.expand(spec, source_path, &mut result)?;
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    fn expand(
        &mut self,
        spec: VarSpec,
        source_path: &Path,
        out: &mut String,
    ) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(&spec.name) {
            out.push_str(&value);
            return Ok(());
        }
        match spec.fallback {
            Fallback::Default(default) => out.push_str(&default),
            Fallback::Required(message) => {
                return Err(ConfigError::EnvVarNotSet {
                    var: spec.name,
                    location: message,
                });
            }
            Fallback::Empty => self.warnings.push(LoadWarning {
                message: format!(
                    "Environment variable '{}' is not set, using empty string",
                    spec.name
                ),
                location: Some(source_path.display().to_string()),
            }),
        }
        Ok(())
    }

    /// Parses the inside of `${...}` after the opening brace.
    fn parse_var_spec(chars: &mut Chars<'_>, source_path: &Path) -> Result<VarSpec, ConfigError> {
        let mut name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => {
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Empty,
                    });
                }
                ':' => match chars.peek() {
                    Some('-') => {
                        chars.next();
                        let default = Self::read_until_close(chars, source_path)?;
                        return Ok(VarSpec {
                            name,
                            fallback: Fallback::Default(default),
                        });
                    }
                    Some('?') => {
                        chars.next();
                        let message = Self::read_until_close(chars, source_path)?;
                        return Ok(VarSpec {
                            name,
                            fallback: Fallback::Required(message),
                        });
                    }
                    _ => name.push(':'),
                },
                _ => name.push(c),
            }
        }

        Err(unclosed(source_path, &format!("${{{name}")))
    }

    /// Reads up to the matching `}`, keeping nested braces.
    fn read_until_close(chars: &mut Chars<'_>, source_path: &Path) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1;

        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }

        Err(unclosed(source_path, &value))
    }
}

struct VarSpec {
    name: String,
    fallback: Fallback,
}

enum Fallback {
    Empty,
    Default(String),
    Required(String),
}

fn unclosed(source_path: &Path, fragment: &str) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::from(source_path),
        line: None,
        message: format!("Unclosed environment variable reference: {fragment}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
