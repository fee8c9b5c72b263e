//! Plan interpretation.
//!
//! This module decodes the planning tool's machine-readable plan into a
//! normalized change model and computes attribute-level diffs.

mod diff;
mod plan;
mod value;

pub use diff::{AttributeChange, AttributeChanges, DiffEngine};
pub use plan::{Action, Plan, PlanParser, ResourceChange};
pub use value::{AttributeMap, AttributeValue};
