//! Writes to storage locations
//!
//! The assigned value is bound to the target operation and to the assignment itself.
//! The symbol is rebound only when the target resolves to a trackable location; writes
//! through anything else (array elements, foreign fields) update operation values only.

use super::binary::derive_binary;
use super::literal::literal_value;
use crate::features::flow_graph::domain::{BinaryOperator, LiteralValue, OperationKind};
use crate::features::processors::domain::{ProcessorError, ProcessorResult, SymbolicContext};
use crate::features::program_state::domain::{ProgramState, SymbolicValue};
use crate::shared::models::OperationId;

pub fn process_assignment(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::SimpleAssignment { target, value } = &operation.kind else {
        return Err(ctx.unsupported("expected an assignment"));
    };
    let (state, assigned) = ctx.operand(ctx.state.clone(), *value)?;
    Ok(vec![store(ctx, &state, *target, assigned)?])
}

pub fn process_compound_assignment(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::CompoundAssignment {
        target,
        value,
        operator,
    } = &operation.kind
    else {
        return Err(ctx.unsupported("expected a compound assignment"));
    };
    let (state, old) = ctx.operand(ctx.state.clone(), *target)?;
    let (state, rhs) = ctx.operand(state, *value)?;
    let Some((state, new)) = derive_binary(ctx.values, &state, *operator, old, rhs) else {
        return Ok(Vec::new());
    };
    Ok(vec![store(ctx, &state, *target, new)?])
}

/// `x++`, `++x`, `x--`, `--x`
///
/// The symbol receives the new value; the operation evaluates to the old value when
/// postfix and to the new value when prefix.
pub fn process_increment(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::Increment {
        target,
        decrement,
        postfix,
    } = &operation.kind
    else {
        return Err(ctx.unsupported("expected an increment"));
    };
    let (state, old) = ctx.operand(ctx.state.clone(), *target)?;
    let Some((state, one)) = literal_value(ctx.values, &state, &LiteralValue::Int(1)) else {
        return Ok(Vec::new());
    };
    let operator = if *decrement {
        BinaryOperator::Subtract
    } else {
        BinaryOperator::Add
    };
    let Some((state, new)) = derive_binary(ctx.values, &state, operator, old, one) else {
        return Ok(Vec::new());
    };

    let state = match state.resolve_capture(ctx.routine, *target) {
        Some(symbol) => state.with_symbol_value(symbol, new),
        None => state,
    };
    let result = if *postfix { old } else { new };
    Ok(vec![ctx.bind(&state, result)?])
}

/// Bind `value` to the target, the current operation and, when trackable, the symbol
fn store(
    ctx: &SymbolicContext<'_>,
    state: &ProgramState,
    target: OperationId,
    value: SymbolicValue,
) -> Result<ProgramState, ProcessorError> {
    let state = ctx.bind(&state.with_operation_value(target, value)?, value)?;
    Ok(match state.resolve_capture(ctx.routine, target) {
        Some(symbol) => state.with_symbol_value(symbol, value),
        None => {
            tracing::trace!(target = %target, "write to an untracked location");
            state
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::processors::infrastructure::test_support::{exact, Harness};
    use crate::shared::models::CaptureId;

    #[test]
    fn test_assignment_round_trip() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let target = h.b.local(x);
        let five = h.b.int(5);
        let assign = h.b.assign(target, five);
        let state = h.run(&[assign]);

        let v = state.operation_value(five).unwrap();
        assert_eq!(state.symbol_value(x), Some(v));
        assert_eq!(state.operation_value(target), Some(v));
        assert_eq!(state.operation_value(assign), Some(v));
    }

    #[test]
    fn test_increment_scenario() {
        // int x = 0; x = x + 1;
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let zero = h.b.int(0);
        let decl = h.b.declare(x, Some(zero));
        let read = h.b.local(x);
        let one = h.b.int(1);
        let sum = h.b.binary(BinaryOperator::Add, read, one);
        let target = h.b.local(x);
        let assign = h.b.assign(target, sum);
        let state = h.run(&[decl, assign]);

        let v0 = state.operation_value(zero).unwrap();
        let v1 = state.symbol_value(x).unwrap();
        assert_ne!(v0, v1);
        assert_eq!(state.operation_value(sum), Some(v1));
        assert_eq!(exact(&state, v1), Some(1));
    }

    #[test]
    fn test_write_through_capture_updates_symbol() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let target = h.b.local(x);
        let capture = h.b.capture(CaptureId(1), target);
        let reference = h.b.capture_ref(CaptureId(1));
        let seven = h.b.int(7);
        let assign = h.b.assign(reference, seven);
        let state = h.run(&[capture, assign]);

        let v = state.operation_value(seven).unwrap();
        assert_eq!(state.symbol_value(x), Some(v));
    }

    #[test]
    fn test_array_element_write_does_not_track() {
        let mut h = Harness::new();
        let items = h.symbols.nullable_local("items");
        let arr = h.b.local(items);
        let zero = h.b.int(0);
        let element = h.b.element(arr, zero);
        let one = h.b.int(1);
        let assign = h.b.assign(element, one);
        let state = h.run(&[assign]);

        let v = state.operation_value(one).unwrap();
        assert_eq!(state.operation_value(assign), Some(v));
        assert!(state.symbol_values().all(|(_, bound)| bound != v));
    }

    #[test]
    fn test_compound_assignment() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let two = h.b.int(2);
        let decl = h.b.declare(x, Some(two));
        let target = h.b.local(x);
        let three = h.b.int(3);
        let add = h.b.compound(BinaryOperator::Multiply, target, three);
        let state = h.run(&[decl, add]);

        let v = state.symbol_value(x).unwrap();
        assert_eq!(exact(&state, v), Some(6));
        assert_eq!(state.operation_value(add), Some(v));
    }

    #[test]
    fn test_postfix_and_prefix_increment_values() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let zero = h.b.int(0);
        let decl = h.b.declare(x, Some(zero));
        let t1 = h.b.local(x);
        let post = h.b.increment(t1, true);
        let t2 = h.b.local(x);
        let pre = h.b.increment(t2, false);
        let t3 = h.b.local(x);
        let dec = h.b.decrement(t3, true);
        let state = h.run(&[decl, post, pre, dec]);

        let value_of = |op| exact(&state, state.operation_value(op).unwrap());
        assert_eq!(value_of(post), Some(0));
        assert_eq!(value_of(pre), Some(2));
        assert_eq!(value_of(dec), Some(2));
        assert_eq!(exact(&state, state.symbol_value(x).unwrap()), Some(1));
    }
}
