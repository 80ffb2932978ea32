//! Calls and allocations
//!
//! The callee is unknown, so a call may change anything reachable from it: `ref`/`out`
//! arguments that resolve to tracked symbols get fresh values and every tracked field is
//! forgotten. The receiver is dereferenced.

use crate::features::flow_graph::domain::{Argument, OperationKind};
use crate::features::processors::domain::{
    dereference, successors, ProcessorError, ProcessorResult, SymbolicContext,
};
use crate::features::program_state::domain::{Constraint, ProgramState};
use crate::shared::models::SymbolId;

pub fn process_invocation(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::Invocation {
        instance,
        method,
        arguments,
    } = &operation.kind
    else {
        return Err(ctx.unsupported("expected an invocation"));
    };
    let mut state = ctx.state.clone();
    if let Some(instance) = instance {
        let (next, receiver) = ctx.operand(state, *instance)?;
        state = dereference(next, receiver);
    }
    let state = invalidate(ctx, state, arguments)?;
    let result = ctx.values.fresh();
    tracing::trace!(method = %method, result = %result, "unknown call");
    Ok(vec![ctx.bind(&state, result)?])
}

pub fn process_object_creation(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::ObjectCreation { arguments, .. } = &operation.kind else {
        return Err(ctx.unsupported("expected an object creation"));
    };
    let state = ctx.state.clone();
    let state = invalidate(ctx, state, arguments)?;
    let result = ctx.values.fresh();
    let state = ctx.bind(&state, result)?;
    successors(state.with_constraint(result, Constraint::NOT_NULL))
}

fn invalidate(
    ctx: &mut SymbolicContext<'_>,
    state: ProgramState,
    arguments: &[Argument],
) -> Result<ProgramState, ProcessorError> {
    let mut state = state;
    for argument in arguments.iter().filter(|a| a.is_writable()) {
        if let Some(symbol) = state.resolve_capture(ctx.routine, argument.value) {
            let value = ctx.values.fresh();
            state = state
                .with_symbol_value(symbol, value)
                .with_operation_value(argument.value, value)?;
        }
    }

    let fields: Vec<SymbolId> = state
        .symbol_values()
        .map(|(symbol, _)| symbol)
        .filter(|symbol| {
            ctx.semantic
                .symbol(*symbol)
                .map_or(false, |info| info.is_field())
        })
        .collect();
    for field in fields {
        state = state.without_symbol_value(field);
    }
    Ok(state)
}
