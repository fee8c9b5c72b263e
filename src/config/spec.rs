//! Configuration specification types for driftwatch.
//!
//! This module defines the structs that map to the `driftwatch.yml` file.

use serde::{Deserialize, Serialize};

/// Planning tool invoked when neither the command line nor the config names one.
pub const DEFAULT_BINARY: &str = "terraform";

/// The root configuration structure for a drift scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriftConfig {
    /// Workspace directories to scan, in order.
    #[serde(default)]
    pub workspaces: Vec<String>,
    /// Slack incoming webhook used for drift alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_webhook: Option<String>,
    /// Planning tool binary (e.g. `terraform` or `tofu`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
}

impl DriftConfig {
    /// Resolves the planning binary: explicit override, then config, then
    /// [`DEFAULT_BINARY`]. Empty strings count as unset.
    #[must_use]
    pub fn resolve_binary(&self, cli_override: Option<&str>) -> String {
        cli_override
            .filter(|b| !b.is_empty())
            .or_else(|| self.binary.as_deref().filter(|b| !b.is_empty()))
            .unwrap_or(DEFAULT_BINARY)
            .to_string()
    }

    /// Resolves the webhook: explicit value first, then the config file.
    #[must_use]
    pub fn resolve_webhook(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .filter(|w| !w.is_empty())
            .or_else(|| self.slack_webhook.as_deref().filter(|w| !w.is_empty()))
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_binary(binary: Option<&str>) -> DriftConfig {
        DriftConfig {
            binary: binary.map(String::from),
            ..DriftConfig::default()
        }
    }

    #[test]
    fn test_binary_override_wins() {
        let config = config_with_binary(Some("tofu"));
        assert_eq!(config.resolve_binary(Some("/opt/terraform")), "/opt/terraform");
    }

    #[test]
    fn test_binary_from_config() {
        let config = config_with_binary(Some("tofu"));
        assert_eq!(config.resolve_binary(None), "tofu");
        assert_eq!(config.resolve_binary(Some("")), "tofu");
    }

    #[test]
    fn test_binary_fallback() {
        assert_eq!(config_with_binary(None).resolve_binary(None), "terraform");
        assert_eq!(config_with_binary(Some("")).resolve_binary(None), "terraform");
    }

    #[test]
    fn test_webhook_precedence() {
        let config = DriftConfig {
            slack_webhook: Some(String::from("https://hooks.example/config")),
            ..DriftConfig::default()
        };
        assert_eq!(
            config.resolve_webhook(Some("https://hooks.example/env")).as_deref(),
            Some("https://hooks.example/env")
        );
        assert_eq!(
            config.resolve_webhook(None).as_deref(),
            Some("https://hooks.example/config")
        );
        assert_eq!(DriftConfig::default().resolve_webhook(Some("")), None);
    }
}
