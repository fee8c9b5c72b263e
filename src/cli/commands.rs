//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Driftwatch - Terraform drift detection across workspaces.
#[derive(Parser, Debug)]
#[command(name = "driftwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "DRIFTWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan all configured workspaces for drift.
    ///
    /// Exits 0 when nothing drifted, 1 when drift was found and 2 when any
    /// workspace could not be scanned.
    Scan {
        /// Planning tool binary (overrides the config file).
        #[arg(long)]
        binary: Option<String>,

        /// Slack incoming-webhook URL (overrides the config file).
        #[arg(long, env = "DRIFTWATCH_SLACK_WEBHOOK")]
        slack_webhook: Option<String>,

        /// Do not send notifications.
        #[arg(long)]
        no_notify: bool,
    },

    /// Validate the configuration file.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Write a starter configuration file.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "driftwatch",
            "--output",
            "json",
            "scan",
            "--binary",
            "tofu",
            "--no-notify",
        ])
        .expect("Arguments should parse");

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Scan {
                binary, no_notify, ..
            } => {
                assert_eq!(binary.as_deref(), Some("tofu"));
                assert!(no_notify);
            }
            other => panic!("Expected scan command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_defaults() {
        let cli = Cli::try_parse_from(["driftwatch", "init"]).expect("Arguments should parse");

        match cli.command {
            Commands::Init { path, force } => {
                assert_eq!(path, PathBuf::from("."));
                assert!(!force);
            }
            other => panic!("Expected init command, got {other:?}"),
        }
    }
}
