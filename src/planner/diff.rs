//! Attribute-level diffing of before/after resource states.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

use super::value::{AttributeMap, AttributeValue};

/// Before and after values of one attribute that differs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    /// Value before the change (`Null` if absent).
    pub before: AttributeValue,
    /// Value after the change (`Null` if absent).
    pub after: AttributeValue,
}

/// Changed attributes keyed by name.
///
/// Ordered by name for stable display only; consumers must not rely on the
/// ordering for correctness.
pub type AttributeChanges = BTreeMap<String, AttributeChange>;

/// Engine for computing attribute diffs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiffEngine;

impl DiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the attributes whose values are not deeply equal.
    ///
    /// Keys from both sides are considered. A key missing on one side
    /// compares as null, so an absent attribute and an explicit null are
    /// the same. A change anywhere inside a nested list or map is reported
    /// once, at its top-level key.
    #[must_use]
    pub fn compute_diff(&self, before: &AttributeMap, after: &AttributeMap) -> AttributeChanges {
        let null = AttributeValue::Null;
        let mut changes = AttributeChanges::new();

        for key in before.keys().chain(after.keys()) {
            if changes.contains_key(key) {
                continue;
            }

            let old = before.get(key).unwrap_or(&null);
            let new = after.get(key).unwrap_or(&null);

            if !old.deep_eq(new) {
                trace!("Attribute {key} changed");
                changes.insert(
                    key.clone(),
                    AttributeChange {
                        before: old.clone(),
                        after: new.clone(),
                    },
                );
            }
        }

        changes
    }
}

impl std::fmt::Display for AttributeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.before, self.after)
    }
}
