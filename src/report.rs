//! Aggregation of scan results.
//!
//! This module folds per-workspace results into summary statistics and the
//! overall outcome that determines the process exit code:
//!
//! | Outcome          | Exit code |
//! |------------------|-----------|
//! | clean            | 0         |
//! | drift detected   | 1         |
//! | scan error       | 2         |
//!
//! A scan error anywhere takes precedence over drift elsewhere, since an
//! incomplete scan cannot vouch for the workspaces it missed.

use serde::Serialize;

use crate::scanner::{ScanResult, WorkspaceStatus};

/// Aggregate drift statistics for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of workspaces in the scan.
    pub workspaces_scanned: usize,
    /// Workspaces scanned successfully with at least one drifted resource.
    pub workspaces_with_drift: usize,
    /// Drifted resources across all successfully scanned workspaces.
    pub total_drifted_resources: usize,
    /// Workspaces that could not be scanned.
    pub scan_errors: usize,
}

/// Overall disposition of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// No drift anywhere.
    Clean,
    /// Drift in at least one workspace, no errors.
    DriftDetected,
    /// At least one workspace could not be scanned.
    ScanError,
}

impl Summary {
    /// Computes the summary in a single pass over all results.
    #[must_use]
    pub fn from_results(results: &[ScanResult]) -> Self {
        results.iter().fold(
            Self {
                workspaces_scanned: results.len(),
                ..Self::default()
            },
            |mut summary, result| {
                match result.status() {
                    WorkspaceStatus::Error => summary.scan_errors += 1,
                    WorkspaceStatus::Drift => {
                        summary.workspaces_with_drift += 1;
                        summary.total_drifted_resources += result.resource_changes.len();
                    }
                    WorkspaceStatus::Clean => {}
                }
                summary
            },
        )
    }

    /// Workspaces scanned successfully without drift.
    #[must_use]
    pub const fn clean_workspaces(&self) -> usize {
        self.workspaces_scanned
            .saturating_sub(self.workspaces_with_drift + self.scan_errors)
    }

    /// Returns true if any workspace shows drift.
    #[must_use]
    pub const fn has_drift(&self) -> bool {
        self.workspaces_with_drift > 0
    }
}

impl ScanOutcome {
    /// Derives the outcome from a summary.
    #[must_use]
    pub const fn from_summary(summary: &Summary) -> Self {
        if summary.scan_errors > 0 {
            Self::ScanError
        } else if summary.workspaces_with_drift > 0 {
            Self::DriftDetected
        } else {
            Self::Clean
        }
    }

    /// Derives the outcome directly from results.
    #[must_use]
    pub fn from_results(results: &[ScanResult]) -> Self {
        Self::from_summary(&Summary::from_results(results))
    }

    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::DriftDetected => 1,
            Self::ScanError => 2,
        }
    }
}

impl From<ScanOutcome> for std::process::ExitCode {
    fn from(outcome: ScanOutcome) -> Self {
        Self::from(outcome.exit_code())
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clean => "no drift",
            Self::DriftDetected => "drift detected",
            Self::ScanError => "scan error",
        };
        write!(f, "{s}")
    }
}
