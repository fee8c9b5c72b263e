//! Drift scanning across workspaces.
//!
//! This module drives the per-workspace pipeline: run the planning tool,
//! parse its plan, and record the drifted resources. Workspaces are scanned
//! one at a time in input order, and a failure in one workspace is recorded
//! on its result without stopping the others.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ScanError;
use crate::planner::{PlanParser, ResourceChange};
use crate::runner::{PlanRunner, WorkspaceTarget};

/// Scan outcome for a single workspace.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Workspace that was scanned.
    pub workspace: WorkspaceTarget,
    /// Drifted resources; empty means no drift. Not meaningful when `error` is set.
    pub resource_changes: Vec<ResourceChange>,
    /// Set if the workspace could not be scanned.
    pub error: Option<ScanError>,
}

/// Classification of a single workspace result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceStatus {
    /// Scanned, no drift.
    Clean,
    /// Scanned, drift present.
    Drift,
    /// Could not be scanned.
    Error,
}

/// Sequential drift scanner.
pub struct Scanner<'a, R: PlanRunner> {
    /// Runs the planning tool.
    runner: &'a R,
    /// Parses plan output.
    parser: PlanParser,
}

impl ScanResult {
    /// A workspace with no drift.
    #[must_use]
    pub const fn clean(workspace: WorkspaceTarget) -> Self {
        Self {
            workspace,
            resource_changes: Vec::new(),
            error: None,
        }
    }

    /// A successfully scanned workspace with the given changes.
    #[must_use]
    pub const fn with_changes(workspace: WorkspaceTarget, resource_changes: Vec<ResourceChange>) -> Self {
        Self {
            workspace,
            resource_changes,
            error: None,
        }
    }

    /// A workspace that could not be scanned.
    #[must_use]
    pub const fn failed(workspace: WorkspaceTarget, error: ScanError) -> Self {
        Self {
            workspace,
            resource_changes: Vec::new(),
            error: Some(error),
        }
    }

    /// Classifies the result. An error shadows any recorded changes.
    #[must_use]
    pub const fn status(&self) -> WorkspaceStatus {
        if self.error.is_some() {
            WorkspaceStatus::Error
        } else if self.resource_changes.is_empty() {
            WorkspaceStatus::Clean
        } else {
            WorkspaceStatus::Drift
        }
    }

    /// Returns true if the workspace was scanned and shows drift.
    #[must_use]
    pub const fn has_drift(&self) -> bool {
        matches!(self.status(), WorkspaceStatus::Drift)
    }
}

impl<'a, R: PlanRunner> Scanner<'a, R> {
    /// Creates a new scanner.
    #[must_use]
    pub const fn new(runner: &'a R) -> Self {
        Self {
            runner,
            parser: PlanParser::new(),
        }
    }

    /// Scans every workspace in order, returning one result per workspace.
    pub fn scan_all(&self, workspaces: &[WorkspaceTarget]) -> Vec<ScanResult> {
        info!("Scanning {} workspace(s) for drift", workspaces.len());

        workspaces
            .iter()
            .map(|workspace| self.scan_workspace(workspace))
            .collect()
    }

    /// Scans a single workspace.
    pub fn scan_workspace(&self, workspace: &WorkspaceTarget) -> ScanResult {
        let outcome = self.runner.run(workspace);

        if let Some(error) = &outcome.error {
            warn!("Workspace {workspace} could not be scanned: {error}");
            return ScanResult::failed(workspace.clone(), error.clone());
        }

        let plan = match self.parser.parse(&outcome.stdout) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Workspace {workspace} produced an unusable plan: {e}");
                return ScanResult::failed(
                    workspace.clone(),
                    ScanError::parse(e.to_string(), &outcome.stderr),
                );
            }
        };

        if outcome.reports_changes() == plan.is_empty() {
            debug!(
                "Workspace {workspace}: exit status {} but {} reportable change(s)",
                outcome.exit_code,
                plan.resource_changes.len()
            );
        }

        info!(
            "Workspace {workspace}: {} drifted resource(s)",
            plan.resource_changes.len()
        );

        ScanResult::with_changes(workspace.clone(), plan.resource_changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Action;
    use crate::runner::{ExecutionOutcome, MockPlanRunner};

    const DRIFT_PLAN: &str = r#"{"format_version":"1.2","resource_changes":[
        {"address":"aws_instance.web","change":{"actions":["update"],"before":{"ami":"ami-old"},"after":{"ami":"ami-new"}}}
    ]}"#;

    const CLEAN_PLAN: &str = r#"{"format_version":"1.2","resource_changes":[]}"#;

    fn exited(workspace: &WorkspaceTarget, stdout: &str, code: i32) -> ExecutionOutcome {
        ExecutionOutcome::exited(workspace.clone(), stdout.as_bytes().to_vec(), Vec::new(), code)
    }

    #[test]
    fn test_clean_workspace() {
        let mut runner = MockPlanRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|ws| exited(ws, CLEAN_PLAN, 0));

        let result = Scanner::new(&runner).scan_workspace(&WorkspaceTarget::new("./infra"));

        assert_eq!(result.status(), WorkspaceStatus::Clean);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_drifted_workspace() {
        let mut runner = MockPlanRunner::new();
        runner.expect_run().returning(|ws| exited(ws, DRIFT_PLAN, 2));

        let result = Scanner::new(&runner).scan_workspace(&WorkspaceTarget::new("./infra"));

        assert!(result.has_drift());
        assert_eq!(result.resource_changes.len(), 1);
        assert_eq!(result.resource_changes[0].action, Action::Update);
    }

    #[test]
    fn test_empty_output_is_parse_error_with_stderr() {
        let mut runner = MockPlanRunner::new();
        runner.expect_run().returning(|ws| {
            ExecutionOutcome::exited(
                ws.clone(),
                Vec::new(),
                b"Error: Terraform initialized in an empty directory!".to_vec(),
                1,
            )
        });

        let result = Scanner::new(&runner).scan_workspace(&WorkspaceTarget::new("./empty"));

        assert_eq!(result.status(), WorkspaceStatus::Error);
        let error = result.error.expect("Expected a scan error");
        assert!(matches!(error, ScanError::Parse { .. }));
        assert!(error.stderr().is_some_and(|s| s.contains("empty directory")));
    }

    #[test]
    fn test_failure_isolated_and_order_preserved() {
        let mut runner = MockPlanRunner::new();
        runner.expect_run().times(3).returning(|ws| {
            match ws.path().to_str() {
                Some("./one") => exited(ws, CLEAN_PLAN, 0),
                Some("./two") => ExecutionOutcome::failed(
                    ws.clone(),
                    Vec::new(),
                    ScanError::execution("terraform", "not found"),
                ),
                _ => exited(ws, DRIFT_PLAN, 2),
            }
        });

        let targets = vec![
            WorkspaceTarget::new("./one"),
            WorkspaceTarget::new("./two"),
            WorkspaceTarget::new("./three"),
        ];
        let results = Scanner::new(&runner).scan_all(&targets);

        assert_eq!(results.len(), 3);
        for (result, target) in results.iter().zip(&targets) {
            assert_eq!(&result.workspace, target);
        }
        assert_eq!(results[0].status(), WorkspaceStatus::Clean);
        assert_eq!(results[1].status(), WorkspaceStatus::Error);
        assert_eq!(results[2].status(), WorkspaceStatus::Drift);
    }

    #[test]
    fn test_no_workspaces() {
        let runner = MockPlanRunner::new();
        assert!(Scanner::new(&runner).scan_all(&[]).is_empty());
    }

    #[test]
    fn test_error_shadows_changes() {
        let mut result = ScanResult::failed(
            WorkspaceTarget::new("./infra"),
            ScanError::execution("terraform", "boom"),
        );
        result.resource_changes = vec![ResourceChange {
            address: String::from("aws_instance.web"),
            action: Action::Create,
            attribute_changes: crate::planner::AttributeChanges::new(),
        }];
        assert_eq!(result.status(), WorkspaceStatus::Error);
        assert!(!result.has_drift());
    }
}
