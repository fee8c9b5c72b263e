// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Driftwatch
//!
//! Drift detection for Terraform workspaces.
//!
//! ## Overview
//!
//! Driftwatch runs the planning tool against each configured workspace,
//! decodes its machine-readable plan, and reports which resources no longer
//! match their declared configuration:
//!
//! - Scan any number of workspaces sequentially, isolating failures
//! - Compute attribute-level before/after diffs for every drifted resource
//! - Summarize the scan and map it to a CI-friendly exit code
//! - Optionally alert a Slack channel when drift is found
//!
//! ## Pipeline
//!
//! 1. **Runner**: invokes `terraform plan -json -detailed-exitcode`
//! 2. **Planner**: parses the plan and diffs each resource's attributes
//! 3. **Report**: aggregates results into a summary and outcome
//! 4. **Notify**: delivers an alert if anything drifted
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing and validation
//! - [`runner`]: Planning tool invocation
//! - [`planner`]: Plan parsing and attribute diffing
//! - [`scanner`]: Per-workspace scan loop
//! - [`report`]: Aggregation and exit codes
//! - [`notify`]: Drift notifications
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! workspaces:
//!   - ./infra/staging
//!   - ./infra/production
//! slack_webhook: https://hooks.slack.com/services/T000/B000/XXXX
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod planner;
pub mod report;
pub mod runner;
pub mod scanner;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, DriftConfig};
pub use error::{DriftwatchError, Result};
pub use notify::{Notifier, NotifyOutcome, SlackNotifier};
pub use planner::{Action, DiffEngine, Plan, PlanParser, ResourceChange};
pub use report::{ScanOutcome, Summary};
pub use runner::{PlanRunner, TerraformRunner, WorkspaceTarget};
pub use scanner::{ScanResult, Scanner};
