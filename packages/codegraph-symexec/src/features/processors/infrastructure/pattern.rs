//! Type tests and pattern matches
//!
//! `v is T` and `v is <pattern>` fold to a boolean when the operand's constraints already
//! decide the match; otherwise they are an undecided boolean the branch splitter forks on.

use crate::features::flow_graph::domain::{LiteralValue, OperationKind, Pattern};
use crate::features::processors::domain::{successors, ProcessorResult, SymbolicContext, ValueKey};
use crate::features::program_state::domain::{
    BoolConstraint, Constraint, ObjectConstraint, ProgramState, SymbolicValue,
};

pub fn process_is_type(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::IsType { value, type_name } = &operation.kind else {
        return Err(ctx.unsupported("expected a type test"));
    };
    let (state, tested) = ctx.operand(ctx.state.clone(), *value)?;
    let result = ctx
        .values
        .intern(ValueKey::TypeTest(type_name.clone(), tested));
    let state = ctx.bind(&state, result)?;
    // null is never an instance of anything
    let decided = match state.nullness(tested) {
        Some(ObjectConstraint::Null) => Some(false),
        _ => None,
    };
    settle(state, result, decided)
}

pub fn process_is_pattern(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::IsPattern { value, pattern } = &operation.kind else {
        return Err(ctx.unsupported("expected a pattern test"));
    };
    let (state, tested) = ctx.operand(ctx.state.clone(), *value)?;
    let result = ctx
        .values
        .intern(ValueKey::Pattern(pattern.clone(), tested));
    let state = ctx.bind(&state, result)?;
    let decided = decide_pattern(&state, tested, pattern);
    settle(state, result, decided)
}

/// Outcome of matching `tested` against `pattern`, when the constraints decide it
pub fn decide_pattern(state: &ProgramState, tested: SymbolicValue, pattern: &Pattern) -> Option<bool> {
    let nullness = state.nullness(tested);
    match pattern {
        Pattern::Discard => Some(true),
        Pattern::Null | Pattern::Constant(LiteralValue::Null) => {
            nullness.map(|n| n == ObjectConstraint::Null)
        }
        Pattern::NotNull => nullness.map(|n| n == ObjectConstraint::NotNull),
        Pattern::Type(_) | Pattern::Constant(LiteralValue::Str(_)) => match nullness {
            Some(ObjectConstraint::Null) => Some(false),
            _ => None,
        },
        Pattern::Constant(LiteralValue::Int(n)) => {
            if nullness == Some(ObjectConstraint::Null) {
                return Some(false);
            }
            let range = state.range(tested)?;
            if !range.contains(*n) {
                Some(false)
            } else {
                range.exact_value().map(|exact| exact == *n)
            }
        }
        Pattern::Constant(LiteralValue::Bool(b)) => {
            if nullness == Some(ObjectConstraint::Null) {
                return Some(false);
            }
            state
                .bool_constraint(tested)
                .map(|actual| actual == BoolConstraint::from_bool(*b))
        }
    }
}

fn settle(state: ProgramState, result: SymbolicValue, decided: Option<bool>) -> ProcessorResult {
    match decided {
        Some(outcome) => successors(state.with_constraint(result, Constraint::from_bool(outcome))),
        None => Ok(vec![state]),
    }
}
