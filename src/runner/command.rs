//! Planning tool invocation.
//!
//! Runs `<binary> plan -json -detailed-exitcode` inside one workspace,
//! captures both output streams in full, and classifies the process outcome.
//! No JSON is interpreted here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_BINARY;
use crate::error::ScanError;

/// Arguments passed to the planning tool.
pub const PLAN_ARGS: &[&str] = &["plan", "-json", "-detailed-exitcode"];

/// Exit status recorded when the tool could not be run at all.
pub const SCAN_ERROR_EXIT_CODE: i32 = 2;

/// A directory holding one independently planned unit of infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceTarget {
    path: PathBuf,
}

/// What happened when the planning tool ran against one workspace.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Workspace the tool ran in.
    pub workspace: WorkspaceTarget,
    /// Raw standard output (the plan document).
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
    /// Process exit status; [`SCAN_ERROR_EXIT_CODE`] when `error` is set.
    pub exit_code: i32,
    /// Set when the process could not be started or did not exit normally.
    pub error: Option<ScanError>,
}

/// Runs a plan for a single workspace.
#[cfg_attr(test, mockall::automock)]
pub trait PlanRunner {
    /// Runs the planning tool in `workspace` and classifies the outcome.
    ///
    /// Never fails: failures are recorded on the returned outcome.
    fn run(&self, workspace: &WorkspaceTarget) -> ExecutionOutcome;
}

/// [`PlanRunner`] backed by a local planning binary.
#[derive(Debug, Clone)]
pub struct TerraformRunner {
    /// Binary name or path.
    binary: String,
}

impl WorkspaceTarget {
    /// Creates a target for the given directory.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the workspace directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for WorkspaceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl ExecutionOutcome {
    /// Outcome of a process that exited normally with `exit_code`.
    #[must_use]
    pub const fn exited(
        workspace: WorkspaceTarget,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        exit_code: i32,
    ) -> Self {
        Self {
            workspace,
            stdout,
            stderr,
            exit_code,
            error: None,
        }
    }

    /// Outcome of a process that could not be run to a normal exit.
    #[must_use]
    pub const fn failed(workspace: WorkspaceTarget, stderr: Vec<u8>, error: ScanError) -> Self {
        Self {
            workspace,
            stdout: Vec::new(),
            stderr,
            exit_code: SCAN_ERROR_EXIT_CODE,
            error: Some(error),
        }
    }

    /// Returns true if the tool signalled that changes are present.
    #[must_use]
    pub const fn reports_changes(&self) -> bool {
        self.error.is_none() && self.exit_code != 0
    }
}

impl TerraformRunner {
    /// Creates a runner for the given binary.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns the binary this runner invokes.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for TerraformRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl PlanRunner for TerraformRunner {
    fn run(&self, workspace: &WorkspaceTarget) -> ExecutionOutcome {
        info!("Running {} plan in {workspace}", self.binary);

        let output = Command::new(&self.binary)
            .args(PLAN_ARGS)
            .current_dir(workspace.path())
            .stdin(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!("Could not start {} in {workspace}: {e}", self.binary);
                return ExecutionOutcome::failed(
                    workspace.clone(),
                    Vec::new(),
                    ScanError::execution(&self.binary, e.to_string()),
                );
            }
        };

        if let Some(code) = output.status.code() {
            debug!("{} exited with status {code} in {workspace}", self.binary);
            ExecutionOutcome::exited(workspace.clone(), output.stdout, output.stderr, code)
        } else {
            warn!("{} terminated abnormally in {workspace}: {}", self.binary, output.status);
            ExecutionOutcome::failed(
                workspace.clone(),
                output.stderr,
                ScanError::execution(&self.binary, format!("process {}", output.status)),
            )
        }
    }
}
