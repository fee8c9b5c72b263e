//! Slack incoming-webhook notifier.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, Url};
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DriftwatchError, NotifyError, Result};
use crate::report::Summary;
use crate::scanner::ScanResult;

use super::{Notifier, NotifyOutcome};

/// Timeout for the webhook request in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Posts drift summaries to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    /// HTTP client.
    client: Client,
    /// Webhook URL.
    webhook_url: Url,
}

/// Slack webhook payload.
#[derive(Debug, Serialize)]
struct SlackMessage {
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<SlackAttachment>,
}

/// Slack message attachment.
#[derive(Debug, Serialize)]
struct SlackAttachment {
    color: &'static str,
    title: &'static str,
    text: String,
    mrkdwn_in: Vec<&'static str>,
    ts: i64,
}

impl SlackNotifier {
    /// Creates a notifier for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(webhook_url: impl AsRef<str>) -> Result<Self> {
        let webhook_url = Url::parse(webhook_url.as_ref()).map_err(|e| {
            DriftwatchError::internal(format!("Invalid webhook URL: {e}"))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                DriftwatchError::internal(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Builds the Slack payload for a batch with drift.
    fn build_message(results: &[ScanResult], summary: &Summary) -> SlackMessage {
        let mut text = String::new();

        let _ = writeln!(
            text,
            "*Drift Detected in {} Workspace(s)*\n",
            summary.workspaces_with_drift
        );
        let _ = writeln!(
            text,
            "Total drifted resources: {}",
            summary.total_drifted_resources
        );

        let drifted: Vec<&ScanResult> = results.iter().filter(|r| r.has_drift()).collect();

        text.push_str("\n*Affected Workspaces:*\n");
        for result in &drifted {
            let _ = writeln!(text, "• {}", result.workspace);
        }

        text.push_str("\n*Changes Summary:*\n");
        for result in &drifted {
            let _ = writeln!(text, "\n{}:", result.workspace);
            for change in &result.resource_changes {
                let _ = writeln!(text, "  • `{}` ({})", change.address, change.action);
            }
        }

        let color = if summary.workspaces_with_drift > 1 {
            "danger"
        } else {
            "warning"
        };

        SlackMessage {
            text: String::from("🚨 Terraform Drift Detected"),
            attachments: vec![SlackAttachment {
                color,
                title: "Drift Summary",
                text,
                mrkdwn_in: vec!["text"],
                ts: Utc::now().timestamp(),
            }],
        }
    }

    /// Posts the payload, mapping every failure to a [`NotifyError`].
    async fn post(&self, message: &SlackMessage) -> std::result::Result<(), NotifyError> {
        let body = serde_json::to_vec(message).map_err(|e| NotifyError::Serialize {
            message: e.to_string(),
        })?;

        let response = self
            .client
            .post(self.webhook_url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, results: &[ScanResult]) -> NotifyOutcome {
        let summary = Summary::from_results(results);
        if !summary.has_drift() {
            debug!("No drift detected, skipping Slack notification");
            return NotifyOutcome::Skipped;
        }

        let message = Self::build_message(results, &summary);

        match self.post(&message).await {
            Ok(()) => {
                info!(
                    "Sent Slack drift notification for {} workspace(s)",
                    summary.workspaces_with_drift
                );
                NotifyOutcome::Delivered
            }
            Err(e) => {
                warn!("Slack notification failed: {e}");
                NotifyOutcome::Failed(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}
