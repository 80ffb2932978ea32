//! `x = x++`
//!
//! The postfix increment evaluates to the old value, which is then written back over the
//! incremented one: the increment is lost.

use crate::features::checks::domain::{FindingSeverity, FindingSink};
use crate::features::checks::ports::{CheckContext, SymbolicCheck};
use crate::features::flow_graph::domain::{Operation, OperationKind, RoutineBody};
use crate::shared::models::OperationId;

#[derive(Debug, Default, Clone, Copy)]
pub struct UselessIncrementCheck;

impl UselessIncrementCheck {
    pub const NAME: &'static str = "useless-increment";

    pub fn new() -> Self {
        Self
    }
}

impl SymbolicCheck for UselessIncrementCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn post_process(&self, ctx: &CheckContext<'_>, sink: &mut dyn FindingSink) {
        let Some(assignment) = ctx.operation else {
            return;
        };
        let OperationKind::SimpleAssignment { target, value } = &assignment.kind else {
            return;
        };
        let Some(increment) = unwrap_value(ctx.routine, *value) else {
            return;
        };
        let OperationKind::Increment {
            target: incremented,
            decrement,
            postfix: true,
        } = &increment.kind
        else {
            return;
        };

        let assigned = ctx.state.resolve_capture(ctx.routine, *target);
        if assigned.is_none() || assigned != ctx.state.resolve_capture(ctx.routine, *incremented) {
            return;
        }

        let verb = if *decrement { "decrement" } else { "increment" };
        let mut finding = ctx.finding(
            Self::NAME,
            FindingSeverity::Error,
            format!("Remove this {verb} or correct the code not to waste it."),
        );
        finding.operation = Some(increment.id);
        finding.line = increment.line.or(assignment.line);
        sink.report(finding);
    }
}

/// Skip parentheses and conversions around an assigned value
fn unwrap_value(routine: &RoutineBody, operation: OperationId) -> Option<&Operation> {
    let mut current = routine.operation(operation)?;
    while let OperationKind::Parenthesized(inner) | OperationKind::Conversion(inner) = &current.kind
    {
        current = routine.operation(*inner)?;
    }
    Some(current)
}
