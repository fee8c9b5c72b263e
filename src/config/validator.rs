//! Configuration validation for scan settings.
//!
//! Errors abort the scan before any workspace is planned; warnings are
//! reported and the scan proceeds.

use crate::error::{ConfigError, DriftwatchError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::spec::DriftConfig;

/// Validator for scan configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing everything found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a scan configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any were found.
    pub fn validate(&self, config: &DriftConfig) -> Result<ValidationResult> {
        let result = self.check(config);

        if let Some(first_error) = result.errors.first() {
            return Err(DriftwatchError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )));
        }

        debug!("Configuration validation passed");
        Ok(result)
    }

    /// Collects all errors and warnings without failing.
    #[must_use]
    pub fn check(&self, config: &DriftConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_workspaces(&config.workspaces, &mut result);
        Self::validate_webhook(config.slack_webhook.as_deref(), &mut result);
        Self::validate_binary(config.binary.as_deref(), &mut result);

        result
    }

    /// Validates the workspace list.
    fn validate_workspaces(workspaces: &[String], result: &mut ValidationResult) {
        if workspaces.is_empty() {
            result
                .warnings
                .push(String::from("No workspaces defined in configuration"));
            return;
        }

        let mut seen = HashSet::new();
        for (i, workspace) in workspaces.iter().enumerate() {
            if workspace.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: format!("workspaces[{i}]"),
                    message: String::from("Workspace path cannot be empty"),
                });
            } else if !seen.insert(workspace.as_str()) {
                result
                    .warnings
                    .push(format!("Workspace '{workspace}' is listed more than once"));
            }
        }
    }

    /// Validates the webhook URL scheme.
    fn validate_webhook(webhook: Option<&str>, result: &mut ValidationResult) {
        if let Some(url) = webhook
            && !url.is_empty()
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            result.errors.push(ValidationError {
                field: String::from("slack_webhook"),
                message: format!("Webhook '{url}' must be an http(s) URL"),
            });
        }
    }

    /// Validates the binary override.
    fn validate_binary(binary: Option<&str>, result: &mut ValidationResult) {
        if binary.is_some_and(|b| b.trim().is_empty()) {
            result.errors.push(ValidationError {
                field: String::from("binary"),
                message: String::from("Binary cannot be blank; omit it to use the default"),
            });
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(workspaces: &[&str]) -> DriftConfig {
        DriftConfig {
            workspaces: workspaces.iter().map(|w| (*w).to_string()).collect(),
            ..DriftConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let result = ConfigValidator::new()
            .validate(&config(&["./infra/staging", "./infra/prod"]))
            .expect("Config should be valid");
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_workspaces_warns() {
        let result = ConfigValidator::new()
            .validate(&config(&[]))
            .expect("Empty workspace list is allowed");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_workspace_warns() {
        let result = ConfigValidator::new()
            .validate(&config(&["./infra", "./infra"]))
            .expect("Duplicates are allowed");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_blank_workspace_is_error() {
        let result = ConfigValidator::new().check(&config(&["./infra", "  "]));
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].field, "workspaces[1]");
    }

    #[test]
    fn test_bad_webhook_is_error() {
        let mut cfg = config(&["./infra"]);
        cfg.slack_webhook = Some(String::from("hooks.slack.com/services/x"));
        let err = ConfigValidator::new().validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn test_blank_binary_is_error() {
        let mut cfg = config(&["./infra"]);
        cfg.binary = Some(String::from(" "));
        assert!(!ConfigValidator::new().check(&cfg).is_valid());
    }
}
