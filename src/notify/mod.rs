//! Drift notifications.
//!
//! Notifiers alert an external service after a scan. They stay silent when
//! no workspace drifted, and a delivery failure is reported locally without
//! affecting the scan's exit code.

mod slack;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::report::Summary;
use crate::scanner::ScanResult;

pub use slack::SlackNotifier;

/// Environment variable holding the Slack webhook URL.
pub const WEBHOOK_ENV_VAR: &str = "DRIFTWATCH_SLACK_WEBHOOK";

/// What a notifier did with a batch of results.
#[derive(Debug)]
pub enum NotifyOutcome {
    /// Nothing drifted, so no request was made.
    Skipped,
    /// The alert was delivered.
    Delivered,
    /// Delivery failed; the scan result is unaffected.
    Failed(NotifyError),
}

/// Trait for drift alert sinks.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends an alert for `results` if any workspace drifted.
    ///
    /// Never returns an error: failures are reported as
    /// [`NotifyOutcome::Failed`].
    async fn notify(&self, results: &[ScanResult]) -> NotifyOutcome;

    /// Gets the notifier name for logging.
    fn name(&self) -> &'static str;
}

/// Reads the webhook URL from [`WEBHOOK_ENV_VAR`]; unset or empty is `None`.
#[must_use]
pub fn webhook_from_env() -> Option<String> {
    std::env::var(WEBHOOK_ENV_VAR)
        .ok()
        .filter(|url| !url.is_empty())
}

/// Sends a Slack alert for `results` through `webhook_url`.
///
/// A notifier that cannot be set up is reported as
/// [`NotifyOutcome::Failed`] like any other delivery failure.
pub async fn notify_slack(webhook_url: &str, results: &[ScanResult]) -> NotifyOutcome {
    match SlackNotifier::new(webhook_url) {
        Ok(notifier) => notifier.notify(results).await,
        Err(_) if !Summary::from_results(results).has_drift() => {
            debug!("No drift detected, skipping Slack notification");
            NotifyOutcome::Skipped
        }
        Err(e) => {
            warn!("Slack notifier unavailable: {e}");
            NotifyOutcome::Failed(NotifyError::Setup {
                message: e.to_string(),
            })
        }
    }
}

impl NotifyOutcome {
    /// Returns true if an alert was delivered.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}
