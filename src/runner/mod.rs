//! Planning tool execution.
//!
//! This module runs the external planning tool against one workspace at a
//! time and reports how the process ended.

mod command;

pub use command::{
    ExecutionOutcome, PLAN_ARGS, PlanRunner, SCAN_ERROR_EXIT_CODE, TerraformRunner,
    WorkspaceTarget,
};

#[cfg(test)]
pub use command::MockPlanRunner;
