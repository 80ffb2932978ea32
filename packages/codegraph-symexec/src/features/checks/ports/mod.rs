//! Symbolic Check Ports
//!
//! Checks observe the exploded graph: the walker calls `post_process` exactly once for
//! every new (program point, state) pair, the routine entry and exception handler entries
//! included. `CheckContext::operation` is the operation just processed, or `None` when the
//! pair is a block entry. States handed to checks are immutable and always feasible.
//!
//! # Implementors
//! - `NullDereferenceCheck`
//! - `UselessIncrementCheck`

use crate::features::checks::domain::{Finding, FindingSeverity, FindingSink};
use crate::features::flow_graph::domain::{Operation, RoutineBody};
use crate::features::flow_graph::ports::SemanticModel;
use crate::features::program_state::domain::ProgramState;
use crate::shared::models::ProgramPoint;

/// What a check sees for one (point, state) pair
pub struct CheckContext<'a> {
    pub routine: &'a RoutineBody,
    pub point: ProgramPoint,
    /// Operation just processed; `None` at a block exit
    pub operation: Option<&'a Operation>,
    pub state: &'a ProgramState,
    pub semantic: &'a dyn SemanticModel,
}

impl<'a> CheckContext<'a> {
    /// Finding anchored at the current operation/point
    pub fn finding(
        &self,
        check: &str,
        severity: FindingSeverity,
        message: impl Into<String>,
    ) -> Finding {
        Finding {
            check: check.to_string(),
            severity,
            routine: self.routine.id(),
            operation: self.operation.map(|op| op.id),
            point: self.point,
            line: self.operation.and_then(|op| op.line),
            message: message.into(),
        }
    }
}

/// Symbolic Check Port - Interface for path-sensitive rules
///
/// Shared read-only between routine workers.
pub trait SymbolicCheck: Send + Sync {
    /// Check name for findings and logging
    fn name(&self) -> &'static str;

    /// Inspect a freshly reached (point, state) pair
    fn post_process(&self, ctx: &CheckContext<'_>, sink: &mut dyn FindingSink);
}
