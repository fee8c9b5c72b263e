//! Configuration module for driftwatch.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `driftwatch.yml`
//! - Validation of configuration values
//! - Resolving the planning binary and webhook with their precedence rules

mod spec;
mod parser;
mod validator;

pub use spec::{DriftConfig, DEFAULT_BINARY};
pub use parser::{ConfigParser, find_config_file, DEFAULT_CONFIG_FILES};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
