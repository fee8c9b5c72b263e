//! Plan document parsing.
//!
//! This module decodes the planning tool's JSON plan into a list of
//! resource changes with real effect, each carrying its attribute diff.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;

use super::diff::{AttributeChanges, DiffEngine};
use super::value::AttributeMap;

/// Kind of change planned for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Resource will be created.
    Create,
    /// Resource will be updated in place.
    Update,
    /// Resource will be destroyed.
    Delete,
    /// Resource will be destroyed and re-created.
    Replace,
    /// Nothing to do.
    NoOp,
    /// Data source will be read.
    Read,
}

/// A resource whose planned change has real effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceChange {
    /// Fully qualified resource address (e.g. `aws_instance.web`).
    pub address: String,
    /// Planned action; never [`Action::NoOp`] or [`Action::Read`].
    pub action: Action,
    /// Attributes whose values differ between before and after.
    pub attribute_changes: AttributeChanges,
}

/// A normalized plan for one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    /// Plan schema version reported by the tool (empty if absent).
    pub format_version: String,
    /// Reportable changes, in the order the tool listed them.
    pub resource_changes: Vec<ResourceChange>,
}

/// Parser turning raw plan output into a [`Plan`].
#[derive(Debug, Default)]
pub struct PlanParser {
    /// Diff engine used for each surviving record.
    diff_engine: DiffEngine,
}

// Wire format. Decoding is lenient: every field may be missing or null and
// then takes the zero value noted on it.

/// Top-level plan document.
#[derive(Debug, Default, Deserialize)]
struct RawPlan {
    /// Missing => "".
    format_version: Option<String>,
    /// Missing => no records.
    resource_changes: Option<Vec<RawResourceChange>>,
}

/// One `resource_changes` entry.
#[derive(Debug, Default, Deserialize)]
struct RawResourceChange {
    /// Missing => "".
    address: Option<String>,
    /// Missing => empty change, which resolves to no-op.
    change: Option<RawChange>,
}

/// The `change` block of a record.
#[derive(Debug, Default, Deserialize)]
struct RawChange {
    /// Missing => no tokens (no-op).
    actions: Option<Vec<String>>,
    /// Missing or null => empty map.
    before: Option<AttributeMap>,
    /// Missing or null => empty map.
    after: Option<AttributeMap>,
}

impl Action {
    /// Resolves the tool's action tokens.
    ///
    /// An empty list is a no-op. Any list of two or more tokens is a replace,
    /// whatever the tokens are; the tool only emits delete+create pairs.
    /// Unknown single tokens are treated as no-op.
    #[must_use]
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        match tokens {
            [] => Self::NoOp,
            [token] => match token.as_ref() {
                "create" => Self::Create,
                "update" => Self::Update,
                "delete" => Self::Delete,
                "read" => Self::Read,
                _ => Self::NoOp,
            },
            _ => Self::Replace,
        }
    }

    /// Returns true if the action represents drift worth reporting.
    #[must_use]
    pub const fn is_reportable(self) -> bool {
        !matches!(self, Self::NoOp | Self::Read)
    }

    /// Returns the action's name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Replace => "replace",
            Self::NoOp => "no-op",
            Self::Read => "read",
        }
    }
}

impl PlanParser {
    /// Creates a new plan parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diff_engine: DiffEngine::new(),
        }
    }

    /// Parses raw plan output.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::EmptyInput`] for zero-length input and
    /// [`PlanError::Decode`] when the bytes are not a plan document.
    pub fn parse(&self, input: &[u8]) -> Result<Plan, PlanError> {
        if input.is_empty() {
            return Err(PlanError::EmptyInput);
        }

        let raw: Option<RawPlan> =
            serde_json::from_slice(input).map_err(|e| PlanError::Decode {
                message: e.to_string(),
            })?;
        let raw = raw.unwrap_or_default();

        let records = raw.resource_changes.unwrap_or_default();
        let total = records.len();

        let resource_changes: Vec<ResourceChange> = records
            .into_iter()
            .filter_map(|record| self.resolve_record(record))
            .collect();

        debug!(
            "Parsed plan: {} of {total} resource change(s) reportable",
            resource_changes.len()
        );

        Ok(Plan {
            format_version: raw.format_version.unwrap_or_default(),
            resource_changes,
        })
    }

    /// Resolves one record, dropping it if it carries no reportable change.
    fn resolve_record(&self, record: RawResourceChange) -> Option<ResourceChange> {
        let change = record.change.unwrap_or_default();
        let action = Action::from_tokens(change.actions.as_deref().unwrap_or_default());

        if !action.is_reportable() {
            return None;
        }

        let before = change.before.unwrap_or_default();
        let after = change.after.unwrap_or_default();

        Some(ResourceChange {
            address: record.address.unwrap_or_default(),
            action,
            attribute_changes: self.diff_engine.compute_diff(&before, &after),
        })
    }
}

impl Plan {
    /// Returns true if the plan has no reportable changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.resource_changes.is_empty()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ResourceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.address, self.action)
    }
}
