//! `validate` command
//!
//! Loads each workout file through the full pipeline and reports every
//! issue found, without playing anything.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadWarning};
use crate::error::{ConfigError, Severity, TabataError, ValidationIssue};

/// Outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate workout files.
///
/// Every file is checked even after a failure; the first failure is
/// returned once all reports are printed.
///
/// # Errors
///
/// Returns the first file's config error, or a validation error for the
/// first file with warnings when `--strict` is set.
pub fn run(args: &ValidateArgs) -> Result<(), TabataError> {
    let loader = ConfigLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<ConfigError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating workout");
        let (report, failure) = check(&loader, path, args.strict);
        if first_failure.is_none() {
            first_failure = failure;
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_failure.map_or(Ok(()), |e| Err(e.into()))
}

fn check(loader: &ConfigLoader, path: &Path, strict: bool) -> (FileReport, Option<ConfigError>) {
    let file = path.display().to_string();
    match loader.load(path) {
        Ok(result) => {
            let warnings: Vec<String> = result.warnings.iter().map(ToString::to_string).collect();
            let failure = (strict && !result.warnings.is_empty()).then(|| {
                ConfigError::ValidationError {
                    path: file.clone(),
                    errors: result.warnings.iter().map(promote).collect(),
                }
            });
            let report = FileReport {
                file,
                valid: failure.is_none(),
                errors: Vec::new(),
                warnings,
            };
            (report, failure)
        }
        Err(err) => {
            let errors = match &err {
                ConfigError::ValidationError { errors, .. } => {
                    errors.iter().map(ToString::to_string).collect()
                }
                other => vec![other.to_string()],
            };
            let report = FileReport {
                file,
                valid: false,
                errors,
                warnings: Vec::new(),
            };
            (report, Some(err))
        }
    }
}

/// Turns a load warning into an error-severity issue for `--strict`.
fn promote(warning: &LoadWarning) -> ValidationIssue {
    ValidationIssue {
        path: warning.location.clone().unwrap_or_default(),
        message: warning.message.clone(),
        severity: Severity::Error,
    }
}

fn print_human(report: &FileReport) {
    let verdict = if report.valid { "ok" } else { "FAILED" };
    println!("{}: {verdict}", report.file);
    for error in &report.errors {
        println!("  {error}");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_valid_file() {
        let file = write_temp("items:\n  - type: exercise\n    name: Row\n    duration: 30\n");
        let (report, failure) = check(&ConfigLoader::with_defaults(), file.path(), false);
        assert!(report.valid);
        assert!(failure.is_none());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_check_collects_validation_errors() {
        let file = write_temp(
            "items:\n  - type: exercise\n    name: A\n    duration: 0\n    repetitions: 0\n",
        );
        let (report, failure) = check(&ConfigLoader::with_defaults(), file.path(), false);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(failure, Some(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let file = write_temp("items: []\n");
        let loader = ConfigLoader::with_defaults();

        let (lenient, failure) = check(&loader, file.path(), false);
        assert!(lenient.valid);
        assert!(failure.is_none());
        assert_eq!(lenient.warnings.len(), 1);

        let (strict, failure) = check(&loader, file.path(), true);
        assert!(!strict.valid);
        match failure {
            Some(ConfigError::ValidationError { errors, .. }) => {
                assert_eq!(errors[0].severity, Severity::Error);
                assert_eq!(errors[0].path, "items");
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_check_missing_file() {
        let (report, failure) = check(
            &ConfigLoader::with_defaults(),
            Path::new("/nonexistent/tabata.yaml"),
            false,
        );
        assert!(!report.valid);
        assert!(report.errors[0].contains("file not found"));
        assert!(matches!(failure, Some(ConfigError::MissingFile { .. })));
    }
}
