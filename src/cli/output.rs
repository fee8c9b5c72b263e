//! Output formatting for CLI commands.
//!
//! This module renders scan reports and validation results either as
//! human-readable text or as JSON for scripting.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{DriftConfig, ValidationResult};
use crate::error::Result;
use crate::planner::ResourceChange;
use crate::report::{ScanOutcome, Summary};
use crate::scanner::{ScanResult, WorkspaceStatus};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Summary row for table display.
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a full drift report.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON report cannot be serialized.
    pub fn format_report(
        &self,
        results: &[ScanResult],
        summary: &Summary,
        outcome: ScanOutcome,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&ReportJson::new(
                results, summary, outcome,
            ))?),
            OutputFormat::Text => Ok(Self::format_report_text(results, summary, outcome)),
        }
    }

    /// Formats a report as text.
    fn format_report_text(results: &[ScanResult], summary: &Summary, outcome: ScanOutcome) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "\n{}", "Drift Scan Summary".bold());

        let rows = vec![
            SummaryRow {
                metric: "Workspaces scanned",
                count: summary.workspaces_scanned,
            },
            SummaryRow {
                metric: "Workspaces with drift",
                count: summary.workspaces_with_drift,
            },
            SummaryRow {
                metric: "Total drifted resources",
                count: summary.total_drifted_resources,
            },
            SummaryRow {
                metric: "Scan errors",
                count: summary.scan_errors,
            },
        ];
        output.push_str(&Table::new(rows).to_string());
        output.push_str("\n\n");

        for result in results {
            Self::format_workspace_text(&mut output, result);
            output.push('\n');
        }

        let _ = writeln!(output, "Result: {}", Self::format_outcome(outcome));

        output
    }

    /// Appends one workspace section.
    fn format_workspace_text(output: &mut String, result: &ScanResult) {
        if let Some(error) = &result.error {
            let _ = writeln!(output, "{} {}", "ERROR:".red().bold(), result.workspace);
            let _ = writeln!(output, "  {error}");
            if let Some(stderr) = error.stderr() {
                for line in stderr.lines() {
                    let _ = writeln!(output, "    {}", line.dimmed());
                }
            }
            return;
        }

        let _ = writeln!(output, "Workspace: {}", result.workspace);

        if result.resource_changes.is_empty() {
            let _ = writeln!(output, "  {}", "No drift detected".green());
            return;
        }

        for change in &result.resource_changes {
            Self::format_resource_text(output, change);
        }
    }

    /// Appends one resource and its attribute diffs.
    fn format_resource_text(output: &mut String, change: &ResourceChange) {
        let _ = writeln!(
            output,
            "  Resource: {} (action: {})",
            change.address,
            change.action.as_str().yellow()
        );

        for (name, attribute) in &change.attribute_changes {
            let _ = writeln!(output, "    {name}:");
            let _ = writeln!(output, "      before: {}", attribute.before);
            let _ = writeln!(output, "      after:  {}", attribute.after);
        }
    }

    /// Formats the outcome with color.
    fn format_outcome(outcome: ScanOutcome) -> String {
        match outcome {
            ScanOutcome::Clean => outcome.to_string().green().to_string(),
            ScanOutcome::DriftDetected => outcome.to_string().yellow().to_string(),
            ScanOutcome::ScanError => outcome.to_string().red().to_string(),
        }
    }

    /// Formats a configuration validation result.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON output cannot be serialized.
    pub fn format_validation(
        &self,
        config: &DriftConfig,
        result: &ValidationResult,
        show_warnings: bool,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "workspaces": config.workspaces,
                    "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "warnings": result.warnings,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Configuration is valid\n", "✓".green())
                } else {
                    format!("{} Configuration is invalid\n", "✗".red())
                };

                let _ = writeln!(output, "   Workspaces: {}", config.workspaces.len());
                let _ = writeln!(
                    output,
                    "   Binary: {}",
                    config.resolve_binary(None)
                );
                let _ = writeln!(
                    output,
                    "   Slack webhook: {}",
                    if config.slack_webhook.is_some() { "configured" } else { "not configured" }
                );

                for error in &result.errors {
                    let _ = writeln!(output, "   {} {error}", "✗".red());
                }

                if show_warnings {
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   {} {warning}", "⚠".yellow());
                    }
                } else if !result.warnings.is_empty() {
                    let _ = writeln!(
                        output,
                        "   {} warning(s), use --warnings to show them",
                        result.warnings.len()
                    );
                }

                Ok(output)
            }
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct ReportJson<'a> {
    summary: &'a Summary,
    outcome: ScanOutcome,
    exit_code: u8,
    workspaces: Vec<WorkspaceJson<'a>>,
}

#[derive(Serialize)]
struct WorkspaceJson<'a> {
    workspace: String,
    status: WorkspaceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    resource_changes: &'a [ResourceChange],
}

impl<'a> ReportJson<'a> {
    fn new(results: &'a [ScanResult], summary: &'a Summary, outcome: ScanOutcome) -> Self {
        Self {
            summary,
            outcome,
            exit_code: outcome.exit_code(),
            workspaces: results.iter().map(WorkspaceJson::from).collect(),
        }
    }
}

impl<'a> From<&'a ScanResult> for WorkspaceJson<'a> {
    fn from(result: &'a ScanResult) -> Self {
        Self {
            workspace: result.workspace.to_string(),
            status: result.status(),
            error: result.error.as_ref().map(ToString::to_string),
            resource_changes: &result.resource_changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::planner::{Action, AttributeChange, AttributeChanges, AttributeValue};
    use crate::runner::WorkspaceTarget;

    fn sample_results() -> Vec<ScanResult> {
        let mut attribute_changes = AttributeChanges::new();
        attribute_changes.insert(
            String::from("tags"),
            AttributeChange {
                before: AttributeValue::Null,
                after: AttributeValue::from(serde_json::json!({"env": "prod"})),
            },
        );
        attribute_changes.insert(
            String::from("ami"),
            AttributeChange {
                before: "ami-old".into(),
                after: "ami-new".into(),
            },
        );

        vec![
            ScanResult::clean(WorkspaceTarget::new("./one")),
            ScanResult::failed(
                WorkspaceTarget::new("./two"),
                ScanError::parse("plan output is empty", b"Error: No configuration files"),
            ),
            ScanResult::with_changes(
                WorkspaceTarget::new("./three"),
                vec![ResourceChange {
                    address: String::from("aws_instance.web"),
                    action: Action::Update,
                    attribute_changes,
                }],
            ),
        ]
    }

    fn render(format: OutputFormat) -> String {
        let results = sample_results();
        let summary = Summary::from_results(&results);
        let outcome = ScanOutcome::from_summary(&summary);
        OutputFormatter::new(format)
            .format_report(&results, &summary, outcome)
            .expect("Report should render")
    }

    #[test]
    fn test_text_report_sections() {
        let text = render(OutputFormat::Text);

        assert!(text.contains("Workspaces scanned"));
        assert!(text.contains("Scan errors"));
        assert!(text.contains("Workspace: ./one"));
        assert!(text.contains("No drift detected"));
        assert!(text.contains("ERROR:"));
        assert!(text.contains("./two"));
        assert!(text.contains("Error: No configuration files"));
        assert!(text.contains("Resource: aws_instance.web"));
        assert!(text.contains("before: <nil>"));
        assert!(text.contains("after:  {env=prod}"));
    }

    #[test]
    fn test_text_report_attributes_sorted() {
        let text = render(OutputFormat::Text);

        let ami = text.find("    ami:").expect("ami attribute should be listed");
        let tags = text.find("    tags:").expect("tags attribute should be listed");
        assert!(ami < tags);
    }

    #[test]
    fn test_json_report_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json)).expect("Report should be JSON");

        assert_eq!(json["outcome"], "scan_error");
        assert_eq!(json["exit_code"], 2);
        assert_eq!(json["summary"]["workspaces_scanned"], 3);
        assert_eq!(json["summary"]["workspaces_with_drift"], 1);

        let workspaces = json["workspaces"].as_array().expect("workspaces array");
        assert_eq!(workspaces.len(), 3);
        assert_eq!(workspaces[0]["status"], "clean");
        assert!(workspaces[0].get("error").is_none());
        assert_eq!(workspaces[1]["status"], "error");
        assert!(workspaces[1]["error"].is_string());

        let change = &workspaces[2]["resource_changes"][0];
        assert_eq!(change["address"], "aws_instance.web");
        assert_eq!(change["action"], "update");
        assert_eq!(change["attribute_changes"]["ami"]["before"], "ami-old");
        assert!(change["attribute_changes"]["tags"]["before"].is_null());
        assert_eq!(change["attribute_changes"]["tags"]["after"]["env"], "prod");
    }

    #[test]
    fn test_json_report_keeps_integer_attributes() {
        let plan = br#"{"resource_changes":[{"address":"aws_lb_listener.http",
            "change":{"actions":["update"],"before":{"port":80},"after":{"port":443}}}]}"#;
        let parsed = crate::planner::PlanParser::new()
            .parse(plan)
            .expect("Plan should parse");
        let results = vec![ScanResult::with_changes(
            WorkspaceTarget::new("./edge"),
            parsed.resource_changes,
        )];
        let summary = Summary::from_results(&results);

        let rendered = OutputFormatter::new(OutputFormat::Json)
            .format_report(&results, &summary, ScanOutcome::from_summary(&summary))
            .expect("Report should render");
        let json: serde_json::Value = serde_json::from_str(&rendered).expect("Report should be JSON");

        let port = &json["workspaces"][0]["resource_changes"][0]["attribute_changes"]["port"];
        assert_eq!(port["before"], serde_json::json!(80));
        assert!(port["before"].is_u64());
        assert!(port["after"].is_u64());
        assert!(!rendered.contains("80.0"));
    }

    #[test]
    fn test_validation_warning_hint() {
        let config = DriftConfig::default();
        let result = ValidationResult {
            errors: Vec::new(),
            warnings: vec![String::from("No workspaces configured")],
        };
        let formatter = OutputFormatter::new(OutputFormat::Text);

        let hidden = formatter
            .format_validation(&config, &result, false)
            .expect("Validation output should render");
        assert!(hidden.contains("1 warning(s)"));

        let shown = formatter
            .format_validation(&config, &result, true)
            .expect("Validation output should render");
        assert!(shown.contains("No workspaces configured"));
    }
}
