//! Binary and unary operators
//!
//! Results are value-numbered by (operator, operand values). When the operands'
//! constraints decide the result it is folded: exact integers fold arithmetic, ranges
//! decide comparisons, nullness decides `== null`, booleans decide logic.

use crate::features::flow_graph::domain::{BinaryOperator, OperationKind, UnaryOperator};
use crate::features::processors::domain::{
    successors, ProcessorResult, SymbolicContext, ValueFactory, ValueKey,
};
use crate::features::program_state::domain::{
    BoolConstraint, Constraint, NumberRange, ObjectConstraint, ProgramState, SymbolicValue,
};

pub fn process_binary(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::Binary {
        operator,
        left,
        right,
    } = &operation.kind
    else {
        return Err(ctx.unsupported("expected a binary operation"));
    };
    let (state, l) = ctx.operand(ctx.state.clone(), *left)?;
    let (state, r) = ctx.operand(state, *right)?;
    let Some((state, value)) = derive_binary(ctx.values, &state, *operator, l, r) else {
        return Ok(Vec::new());
    };
    Ok(vec![ctx.bind(&state, value)?])
}

pub fn process_unary(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::Unary { operator, operand } = &operation.kind else {
        return Err(ctx.unsupported("expected a unary operation"));
    };
    let (state, v) = ctx.operand(ctx.state.clone(), *operand)?;
    let value = ctx.values.intern(ValueKey::Unary(*operator, v));
    let state = ctx.bind(&state, value)?;
    let folded = match operator {
        UnaryOperator::Not => state
            .bool_constraint(v)
            .map(|b| Constraint::Bool(b.opposite())),
        UnaryOperator::Negate => exact(&state, v)
            .and_then(i64::checked_neg)
            .map(|n| Constraint::Range(NumberRange::exact(n))),
    };
    match folded {
        Some(constraint) => successors(state.with_constraint(value, constraint)),
        None => Ok(vec![state]),
    }
}

/// Value-numbered result of `left operator right`; `None` when the fold contradicts
/// constraints already learned about the result
pub fn derive_binary(
    values: &mut ValueFactory,
    state: &ProgramState,
    operator: BinaryOperator,
    left: SymbolicValue,
    right: SymbolicValue,
) -> Option<(ProgramState, SymbolicValue)> {
    let value = values.intern(ValueKey::Binary(operator, left, right));
    let folded = fold(state, operator, left, right);
    let state = match folded {
        Some(constraint) => state.with_constraint(value, constraint)?,
        None => state.clone(),
    };
    Some((state, value))
}

fn fold(
    state: &ProgramState,
    operator: BinaryOperator,
    left: SymbolicValue,
    right: SymbolicValue,
) -> Option<Constraint> {
    use BinaryOperator::*;
    match operator {
        Add | Subtract | Multiply | Divide | Remainder => {
            let (a, b) = (exact(state, left)?, exact(state, right)?);
            let result = match operator {
                Add => a.checked_add(b),
                Subtract => a.checked_sub(b),
                Multiply => a.checked_mul(b),
                Divide => a.checked_div(b),
                _ => a.checked_rem(b),
            }?;
            Some(Constraint::Range(NumberRange::exact(result)))
        }
        Equals | NotEquals => {
            let equal = decide_equality(state, left, right)?;
            Some(Constraint::from_bool(equal == (operator == Equals)))
        }
        LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => {
            let (a, b) = (state.range(left)?, state.range(right)?);
            compare_ranges(operator, &a, &b).map(Constraint::from_bool)
        }
        And | Or => {
            let (a, b) = (state.bool_constraint(left), state.bool_constraint(right));
            let result = match operator {
                And => match (a, b) {
                    (Some(BoolConstraint::False), _) | (_, Some(BoolConstraint::False)) => false,
                    (Some(BoolConstraint::True), Some(BoolConstraint::True)) => true,
                    _ => return None,
                },
                _ => match (a, b) {
                    (Some(BoolConstraint::True), _) | (_, Some(BoolConstraint::True)) => true,
                    (Some(BoolConstraint::False), Some(BoolConstraint::False)) => false,
                    _ => return None,
                },
            };
            Some(Constraint::from_bool(result))
        }
    }
}

/// `Some(true)` when the values are certainly equal, `Some(false)` when certainly not
fn decide_equality(state: &ProgramState, left: SymbolicValue, right: SymbolicValue) -> Option<bool> {
    if left == right {
        return Some(true);
    }
    match (state.nullness(left), state.nullness(right)) {
        (Some(ObjectConstraint::Null), Some(ObjectConstraint::Null)) => return Some(true),
        (Some(ObjectConstraint::Null), Some(ObjectConstraint::NotNull))
        | (Some(ObjectConstraint::NotNull), Some(ObjectConstraint::Null)) => return Some(false),
        _ => {}
    }
    if let (Some(a), Some(b)) = (state.range(left), state.range(right)) {
        if a.intersect(&b).is_none() {
            return Some(false);
        }
        if let (Some(x), Some(y)) = (a.exact_value(), b.exact_value()) {
            return Some(x == y);
        }
    }
    if let (Some(a), Some(b)) = (state.bool_constraint(left), state.bool_constraint(right)) {
        return Some(a == b);
    }
    None
}

/// Decide a relational comparison over ranges when the intervals allow it
pub fn compare_ranges(operator: BinaryOperator, a: &NumberRange, b: &NumberRange) -> Option<bool> {
    let lt = |x: &NumberRange, y: &NumberRange| -> Option<bool> {
        match (x.max, y.min, x.min, y.max) {
            (Some(xmax), Some(ymin), _, _) if xmax < ymin => Some(true),
            (_, _, Some(xmin), Some(ymax)) if xmin >= ymax => Some(false),
            _ => None,
        }
    };
    let le = |x: &NumberRange, y: &NumberRange| -> Option<bool> {
        match (x.max, y.min, x.min, y.max) {
            (Some(xmax), Some(ymin), _, _) if xmax <= ymin => Some(true),
            (_, _, Some(xmin), Some(ymax)) if xmin > ymax => Some(false),
            _ => None,
        }
    };
    match operator {
        BinaryOperator::LessThan => lt(a, b),
        BinaryOperator::LessThanOrEqual => le(a, b),
        BinaryOperator::GreaterThan => lt(b, a),
        BinaryOperator::GreaterThanOrEqual => le(b, a),
        _ => None,
    }
}

fn exact(state: &ProgramState, value: SymbolicValue) -> Option<i64> {
    state.range(value).and_then(|r| r.exact_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::processors::infrastructure::test_support::{exact, Harness};

    #[test]
    fn test_arithmetic_on_exact_values_folds() {
        let mut h = Harness::new();
        let two = h.b.int(2);
        let three = h.b.int(3);
        let sum = h.b.binary(BinaryOperator::Add, two, three);
        let seven = h.b.int(7);
        let four = h.b.int(4);
        let diff = h.b.binary(BinaryOperator::Subtract, seven, four);
        let state = h.run(&[sum, diff]);

        let sum_value = state.operation_value(sum).unwrap();
        assert_eq!(exact(&state, sum_value), Some(5));
        assert_eq!(exact(&state, state.operation_value(diff).unwrap()), Some(3));
    }

    #[test]
    fn test_division_by_zero_does_not_fold() {
        let mut h = Harness::new();
        let one = h.b.int(1);
        let zero = h.b.int(0);
        let div = h.b.binary(BinaryOperator::Divide, one, zero);
        let state = h.run(&[div]);
        let value = state.operation_value(div).unwrap();
        assert_eq!(state.range(value), None);
    }

    #[test]
    fn test_same_operands_same_value() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let a = h.b.local(x);
        let one = h.b.int(1);
        let first = h.b.binary(BinaryOperator::Add, a, one);
        let b = h.b.local(x);
        let one_again = h.b.int(1);
        let second = h.b.binary(BinaryOperator::Add, b, one_again);
        let state = h.run(&[first, second]);

        assert_eq!(state.operation_value(first), state.operation_value(second));
    }

    #[test]
    fn test_comparisons_fold() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let a = h.b.local(x);
        let b = h.b.local(x);
        let same = h.b.binary(BinaryOperator::Equals, a, b);
        let one = h.b.int(1);
        let two = h.b.int(2);
        let less = h.b.binary(BinaryOperator::LessThan, one, two);
        let s = h.symbols.nullable_local("s");
        let nul = h.b.null();
        let decl = h.b.declare(s, Some(nul));
        let read = h.b.local(s);
        let nul_again = h.b.null();
        let is_null = h.b.binary(BinaryOperator::NotEquals, read, nul_again);
        let state = h.run(&[same, less, decl, is_null]);

        let truth = |op| state.bool_constraint(state.operation_value(op).unwrap());
        assert_eq!(truth(same), Some(BoolConstraint::True));
        assert_eq!(truth(less), Some(BoolConstraint::True));
        assert_eq!(truth(is_null), Some(BoolConstraint::False));
    }

    #[test]
    fn test_unknown_comparison_stays_unconstrained() {
        let mut h = Harness::new();
        let x = h.symbols.local("x");
        let a = h.b.local(x);
        let ten = h.b.int(10);
        let less = h.b.binary(BinaryOperator::LessThan, a, ten);
        let state = h.run(&[less]);
        let value = state.operation_value(less).unwrap();
        assert_eq!(state.bool_constraint(value), None);
    }

    #[test]
    fn test_unary_folds() {
        let mut h = Harness::new();
        let yes = h.b.boolean(true);
        let not = h.b.not(yes);
        let five = h.b.int(5);
        let neg = h.b.negate(five);
        let state = h.run(&[not, neg]);

        let not_value = state.operation_value(not).unwrap();
        assert_eq!(state.bool_constraint(not_value), Some(BoolConstraint::False));
        assert_eq!(exact(&state, state.operation_value(neg).unwrap()), Some(-5));
    }

    #[test]
    fn test_range_comparison_decisions() {
        let low = NumberRange::between(0, 4);
        let high = NumberRange::at_least(5);
        assert_eq!(compare_ranges(BinaryOperator::LessThan, &low, &high), Some(true));
        assert_eq!(compare_ranges(BinaryOperator::GreaterThanOrEqual, &low, &high), Some(false));
        assert_eq!(
            compare_ranges(BinaryOperator::LessThan, &high, &NumberRange::exact(5)),
            Some(false)
        );
        assert_eq!(
            compare_ranges(BinaryOperator::LessThanOrEqual, &low, &NumberRange::exact(3)),
            None
        );
    }
}
