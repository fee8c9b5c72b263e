//! Error types for the driftwatch scanner.
//!
//! This module provides the error hierarchy for every stage of a drift scan:
//! configuration loading, per-workspace scanning, and notification delivery.
//!
//! Per-workspace [`ScanError`]s are recorded as data on each scan result and
//! never abort a batch; only configuration and runtime failures surface as a
//! top-level [`DriftwatchError`].

use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of stderr characters kept on a parse error.
const STDERR_PREVIEW_CHARS: usize = 2_000;

/// The main error type for driftwatch.
#[derive(Debug, Error)]
pub enum DriftwatchError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },
}

/// Plan document decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The planning tool produced no output at all.
    #[error("plan output is empty (was the tool run in -json mode?)")]
    EmptyInput,

    /// The output is not a valid plan document.
    #[error("malformed plan document: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

/// Failure to scan one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The planning tool could not be started or terminated abnormally.
    #[error("failed to run {binary}: {message}")]
    Execution {
        /// Binary that was invoked.
        binary: String,
        /// Description of the failure.
        message: String,
    },

    /// The plan output was empty or not a valid plan document.
    #[error("parsing plan JSON: {message}")]
    Parse {
        /// Description of the decode failure.
        message: String,
        /// Trimmed stderr of the planning tool, if it wrote any.
        stderr: Option<String>,
    },
}

/// Notification delivery errors.
///
/// These never change the outcome of a scan; the notifier reports them
/// locally and moves on.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The payload could not be serialized.
    #[error("failed to serialize notification payload: {message}")]
    Serialize {
        /// Description of the serialization error.
        message: String,
    },

    /// The notifier could not be set up.
    #[error("notifier unavailable: {message}")]
    Setup {
        /// Description of the setup failure.
        message: String,
    },

    /// The request could not be delivered.
    #[error("failed to send notification: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
    },

    /// The webhook answered with a non-success status.
    #[error("webhook returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },
}

/// Result type alias for driftwatch operations.
pub type Result<T> = std::result::Result<T, DriftwatchError>;

impl DriftwatchError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ScanError {
    /// Creates an execution error.
    #[must_use]
    pub fn execution(binary: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            binary: binary.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error, attaching the tool's stderr when it has content.
    #[must_use]
    pub fn parse(message: impl Into<String>, stderr: &[u8]) -> Self {
        let stderr: String = String::from_utf8_lossy(stderr)
            .trim()
            .chars()
            .take(STDERR_PREVIEW_CHARS)
            .collect();
        Self::Parse {
            message: message.into(),
            stderr: (!stderr.is_empty()).then_some(stderr),
        }
    }

    /// Returns the captured stderr excerpt, if any.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Parse { stderr, .. } => stderr.as_deref(),
            Self::Execution { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_stderr() {
        let err = ScanError::parse("empty plan output", b"  Error: No configuration files\n");
        assert_eq!(err.stderr(), Some("Error: No configuration files"));
        assert_eq!(err.to_string(), "parsing plan JSON: empty plan output");
    }

    #[test]
    fn test_parse_error_drops_blank_stderr() {
        let err = ScanError::parse("bad", b" \n");
        assert_eq!(err.stderr(), None);
    }

    #[test]
    fn test_serialization_error_converts() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("Invalid JSON");
        let err = DriftwatchError::from(source);
        assert!(matches!(err, DriftwatchError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[test]
    fn test_execution_error_display() {
        let err = ScanError::execution("terraform", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "failed to run terraform: No such file or directory"
        );
    }
}
