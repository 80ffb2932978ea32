//! Constants, `this` and opaque expressions

use crate::features::flow_graph::domain::{LiteralValue, OperationKind};
use crate::features::processors::domain::{
    successors, ProcessorResult, SymbolicContext, ValueFactory, ValueKey,
};
use crate::features::program_state::domain::{Constraint, NumberRange, ProgramState, SymbolicValue};

/// Interned value of a literal, with the constraints every occurrence carries
pub fn literal_value(
    values: &mut ValueFactory,
    state: &ProgramState,
    literal: &LiteralValue,
) -> Option<(ProgramState, SymbolicValue)> {
    let value = values.intern(ValueKey::Literal(literal.clone()));
    let constraints: Vec<Constraint> = match literal {
        LiteralValue::Int(n) => {
            vec![Constraint::Range(NumberRange::exact(*n)), Constraint::NOT_NULL]
        }
        LiteralValue::Bool(b) => vec![Constraint::from_bool(*b), Constraint::NOT_NULL],
        LiteralValue::Str(_) => vec![Constraint::NOT_NULL],
        LiteralValue::Null => vec![Constraint::NULL],
    };
    state
        .with_constraints(value, constraints)
        .map(|state| (state, value))
}

pub fn process_literal(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::Literal(literal) = &operation.kind else {
        return Err(ctx.unsupported("expected a literal"));
    };
    let Some((state, value)) = literal_value(ctx.values, ctx.state, literal) else {
        return Ok(Vec::new());
    };
    Ok(vec![ctx.bind(&state, value)?])
}

pub fn process_instance_reference(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let value = ctx.values.intern(ValueKey::Instance);
    let state = ctx.bind(ctx.state, value)?;
    successors(state.with_constraint(value, Constraint::NOT_NULL))
}

/// Expression without modeled semantics: an unknown value
pub fn process_opaque(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let value = ctx.values.fresh();
    Ok(vec![ctx.bind(ctx.state, value)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::processors::domain::ProcessorError;
    use crate::features::program_state::domain::StateError;
    use crate::features::processors::infrastructure::test_support::{exact, Harness};
    use crate::features::program_state::domain::{BoolConstraint, ObjectConstraint};
    use crate::shared::models::RoutineId;

    #[test]
    fn test_literals_are_interned_and_constrained() {
        let mut h = Harness::new();
        let five = h.b.int(5);
        let also_five = h.b.int(5);
        let yes = h.b.boolean(true);
        let text = h.b.string("s");
        let nothing = h.b.null();
        let state = h.run(&[five, also_five, yes, text, nothing]);

        let v = state.operation_value(five).unwrap();
        assert_eq!(state.operation_value(also_five), Some(v));
        assert_eq!(exact(&state, v), Some(5));

        let b = state.operation_value(yes).unwrap();
        assert_eq!(state.bool_constraint(b), Some(BoolConstraint::True));

        let s = state.operation_value(text).unwrap();
        assert_eq!(state.nullness(s), Some(ObjectConstraint::NotNull));

        let n = state.operation_value(nothing).unwrap();
        assert_eq!(state.nullness(n), Some(ObjectConstraint::Null));
    }

    #[test]
    fn test_this_is_not_null() {
        let mut h = Harness::new();
        let this = h.b.this();
        let state = h.run(&[this]);
        let v = state.operation_value(this).unwrap();
        assert_eq!(state.nullness(v), Some(ObjectConstraint::NotNull));
    }

    #[test]
    fn test_opaque_yields_fresh_values() {
        let mut h = Harness::new();
        let a = h.b.other("sizeof(int)");
        let b = h.b.other("sizeof(int)");
        let state = h.run(&[a, b]);
        assert_ne!(state.operation_value(a), state.operation_value(b));
        assert!(state.operation_value(a).is_some());
    }

    #[test]
    fn test_foreign_state_is_a_state_error() {
        let mut h = Harness::new();
        let five = h.b.int(5);
        let body = h.build(&[five]);
        let err = h
            .eval(&body, ProgramState::empty(RoutineId(9)), five)
            .unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::State(StateError::UnknownOperation { .. })
        ));
    }
}
