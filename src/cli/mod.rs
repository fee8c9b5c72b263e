//! CLI module for driftwatch.
//!
//! This module provides the command-line interface for scanning
//! workspaces and managing the configuration file.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
