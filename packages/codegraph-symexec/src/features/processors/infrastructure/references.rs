//! Reads of storage locations
//!
//! Locals, parameters and trackable fields are learned lazily: the first read of an
//! unbound symbol invents a fresh value and binds it to both the symbol and the
//! operation. Pure write targets are not read, so they are left alone.

use crate::features::flow_graph::domain::OperationKind;
use crate::features::processors::domain::{
    dereference, successors, ProcessorResult, SymbolicContext,
};
use crate::features::program_state::domain::{Constraint, ProgramState, SymbolicValue};
use crate::shared::models::SymbolId;

pub fn process_symbol_reference(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let symbol = match &operation.kind {
        OperationKind::LocalReference(symbol) | OperationKind::ParameterReference(symbol) => {
            *symbol
        }
        _ => return Err(ctx.unsupported("expected a local or parameter reference")),
    };
    if ctx.routine.is_write_target(operation.id) {
        return Ok(vec![ctx.state.clone()]);
    }
    let state = ctx.state.clone();
    match ctx.state.resolve_capture(ctx.routine, operation.id) {
        Some(tracked) => read_symbol(ctx, state, tracked),
        // closure-capture cycle: storage owner unknown
        None => read_unknown(ctx, state, symbol),
    }
}

pub fn process_field_reference(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::FieldReference { instance, field } = &operation.kind else {
        return Err(ctx.unsupported("expected a field reference"));
    };
    let mut state = ctx.state.clone();
    if let Some(instance) = instance {
        let (next, receiver) = ctx.operand(state, *instance)?;
        state = dereference(next, receiver);
    }
    if ctx.routine.is_write_target(operation.id) {
        return Ok(vec![state]);
    }
    match state.resolve_capture(ctx.routine, operation.id) {
        Some(tracked) => read_symbol(ctx, state, tracked),
        None => read_unknown(ctx, state, *field),
    }
}

pub fn process_array_element(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::ArrayElementReference { array, index } = &operation.kind else {
        return Err(ctx.unsupported("expected an array element reference"));
    };
    let (state, receiver) = ctx.operand(ctx.state.clone(), *array)?;
    let (state, _) = ctx.operand(state, *index)?;
    let state = dereference(state, receiver);
    if ctx.routine.is_write_target(operation.id) {
        return Ok(vec![state]);
    }
    let value = ctx.values.fresh();
    Ok(vec![ctx.bind(&state, value)?])
}

/// Parenthesized expressions and conversions carry their operand's value
pub fn process_pass_through(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let inner = match &operation.kind {
        OperationKind::Parenthesized(inner) | OperationKind::Conversion(inner) => *inner,
        _ => return Err(ctx.unsupported("expected a parenthesized expression or conversion")),
    };
    if ctx.routine.is_write_target(operation.id) {
        return Ok(vec![ctx.state.clone()]);
    }
    let (state, value) = ctx.operand(ctx.state.clone(), inner)?;
    Ok(vec![ctx.bind(&state, value)?])
}

pub fn process_flow_capture(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::FlowCapture { id, value } = &operation.kind else {
        return Err(ctx.unsupported("expected a flow capture"));
    };
    let state = ctx.state.with_capture(*id, *value)?;
    if ctx.routine.is_write_target(*value) {
        // captured write location: nothing to read
        return Ok(vec![state]);
    }
    let (state, captured) = ctx.operand(state, *value)?;
    Ok(vec![ctx.bind(&state, captured)?])
}

pub fn process_flow_capture_reference(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::FlowCaptureReference(capture) = &operation.kind else {
        return Err(ctx.unsupported("expected a flow capture reference"));
    };
    if ctx.routine.is_write_target(operation.id) {
        return Ok(vec![ctx.state.clone()]);
    }
    let state = ctx.state.clone();
    let (state, value) = match state.capture(*capture) {
        Some(captured) => ctx.operand(state, captured)?,
        None => {
            tracing::debug!(capture = %capture, "reference to an unrecorded flow capture");
            let value = ctx.values.fresh();
            (state, value)
        }
    };
    Ok(vec![ctx.bind(&state, value)?])
}

fn read_symbol(
    ctx: &mut SymbolicContext<'_>,
    state: ProgramState,
    symbol: SymbolId,
) -> ProcessorResult {
    if let Some(value) = state.symbol_value(symbol) {
        return Ok(vec![ctx.bind(&state, value)?]);
    }
    let value = ctx.values.fresh();
    let state = ctx.bind(&state, value)?.with_symbol_value(symbol, value);
    successors(learn_declared_nullness(ctx, state, symbol, value))
}

fn read_unknown(
    ctx: &mut SymbolicContext<'_>,
    state: ProgramState,
    symbol: SymbolId,
) -> ProcessorResult {
    let value = ctx.values.fresh();
    let state = ctx.bind(&state, value)?;
    successors(learn_declared_nullness(ctx, state, symbol, value))
}

fn learn_declared_nullness(
    ctx: &SymbolicContext<'_>,
    state: ProgramState,
    symbol: SymbolId,
    value: SymbolicValue,
) -> Option<ProgramState> {
    match ctx.semantic.symbol(symbol) {
        Some(info) if !info.nullable => state.with_constraint(value, Constraint::NOT_NULL),
        _ => Some(state),
    }
}
