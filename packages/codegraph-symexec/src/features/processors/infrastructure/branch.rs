//! Conditional branch splitting
//!
//! Called by the walker at a `Branch` exit, after the condition has been evaluated. An
//! undecided condition forks into a `true` and a `false` successor; a decided one keeps
//! only the consistent side. Each side may additionally learn about the condition's
//! operands (`x == null`, `x is T`, `i < 10`); a side whose learned constraints
//! contradict is dropped.

use crate::config::ExplorationConfig;
use crate::features::flow_graph::domain::{
    BinaryOperator, LiteralValue, OperationKind, Pattern, RoutineBody, UnaryOperator,
};
use crate::features::processors::domain::{ProcessorError, ValueFactory};
use crate::features::program_state::domain::{
    Constraint, NumberRange, ObjectConstraint, ProgramState, SymbolicValue,
};
use crate::shared::models::OperationId;

/// One feasible side of a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSuccessor {
    pub outcome: bool,
    pub state: ProgramState,
}

pub fn split(
    values: &mut ValueFactory,
    routine: &RoutineBody,
    config: &ExplorationConfig,
    state: &ProgramState,
    condition: OperationId,
) -> Result<Vec<BranchSuccessor>, ProcessorError> {
    let (state, value) = match state.operation_value(condition) {
        Some(value) => (state.clone(), value),
        None => {
            let value = values.fresh();
            (state.with_operation_value(condition, value)?, value)
        }
    };

    if let Some(decided) = state.bool_constraint(value) {
        return Ok(vec![BranchSuccessor {
            outcome: decided.as_bool(),
            state,
        }]);
    }

    let mut successors = Vec::with_capacity(2);
    for outcome in [true, false] {
        let Some(mut next) = state.with_constraint(value, Constraint::from_bool(outcome)) else {
            continue;
        };
        if config.learn_branch_constraints {
            match learn(routine, next, condition, outcome) {
                Some(learned) => next = learned,
                None => {
                    tracing::trace!(condition = %condition, outcome, "infeasible branch side");
                    continue;
                }
            }
        }
        successors.push(BranchSuccessor {
            outcome,
            state: next,
        });
    }
    Ok(successors)
}

/// Constraints implied on the operands of `operation` evaluating to `outcome`
fn learn(
    routine: &RoutineBody,
    state: ProgramState,
    operation: OperationId,
    outcome: bool,
) -> Option<ProgramState> {
    let Some(op) = routine.operation(operation) else {
        return Some(state);
    };
    match &op.kind {
        OperationKind::Parenthesized(inner) | OperationKind::Conversion(inner) => {
            learn(routine, state, *inner, outcome)
        }
        OperationKind::Unary {
            operator: UnaryOperator::Not,
            operand,
        } => {
            let state = constrain(state, *operand, Constraint::from_bool(!outcome))?;
            learn(routine, state, *operand, !outcome)
        }
        OperationKind::Binary {
            operator: BinaryOperator::And,
            left,
            right,
        } if outcome => learn_both(routine, state, *left, *right, true),
        OperationKind::Binary {
            operator: BinaryOperator::Or,
            left,
            right,
        } if !outcome => learn_both(routine, state, *left, *right, false),
        OperationKind::Binary {
            operator,
            left,
            right,
        } if operator.is_comparison() => {
            let effective = match (outcome, operator.negated()) {
                (true, _) => *operator,
                (false, Some(negated)) => negated,
                (false, None) => return Some(state),
            };
            learn_comparison(state, effective, outcome, *left, *right)
        }
        OperationKind::IsType { value, .. } if outcome => {
            constrain(state, *value, Constraint::NOT_NULL)
        }
        OperationKind::IsPattern { value, pattern } => {
            learn_pattern(state, *value, pattern, outcome)
        }
        _ => Some(state),
    }
}

fn learn_both(
    routine: &RoutineBody,
    state: ProgramState,
    left: OperationId,
    right: OperationId,
    outcome: bool,
) -> Option<ProgramState> {
    let state = constrain(state, left, Constraint::from_bool(outcome))?;
    let state = constrain(state, right, Constraint::from_bool(outcome))?;
    let state = learn(routine, state, left, outcome)?;
    learn(routine, state, right, outcome)
}

fn learn_comparison(
    state: ProgramState,
    operator: BinaryOperator,
    outcome: bool,
    left: OperationId,
    right: OperationId,
) -> Option<ProgramState> {
    let (Some(l), Some(r)) = (state.operation_value(left), state.operation_value(right)) else {
        return Some(state);
    };

    if matches!(operator, BinaryOperator::Equals | BinaryOperator::NotEquals) {
        let learned = if operator == BinaryOperator::Equals {
            Constraint::NULL
        } else {
            Constraint::NOT_NULL
        };
        if state.nullness(r) == Some(ObjectConstraint::Null) {
            return state.with_constraint(l, learned);
        }
        if state.nullness(l) == Some(ObjectConstraint::Null) {
            return state.with_constraint(r, learned);
        }
    }

    let exact = |v: SymbolicValue| state.range(v).and_then(|range| range.exact_value());
    let (target, operator, bound) = match (exact(l), exact(r)) {
        (_, Some(n)) => (l, operator, n),
        (Some(n), None) => (r, operator.mirrored(), n),
        _ => return Some(state),
    };
    // a failed lifted comparison says nothing about a possibly-null operand
    if !outcome && state.nullness(target) != Some(ObjectConstraint::NotNull) {
        return Some(state);
    }
    match narrowed_range(&state, target, operator, bound) {
        Some(range) => state.with_constraint(target, Constraint::Range(range)),
        None => Some(state),
    }
}

/// Range implied for `target` by `target operator bound` holding
fn narrowed_range(
    state: &ProgramState,
    target: SymbolicValue,
    operator: BinaryOperator,
    bound: i64,
) -> Option<NumberRange> {
    match operator {
        BinaryOperator::Equals => Some(NumberRange::exact(bound)),
        BinaryOperator::NotEquals => {
            let current = state.range(target)?;
            if current.min == Some(bound) {
                Some(NumberRange::at_least(bound.checked_add(1)?))
            } else if current.max == Some(bound) {
                Some(NumberRange::at_most(bound.checked_sub(1)?))
            } else {
                None
            }
        }
        BinaryOperator::LessThan => Some(NumberRange::at_most(bound.checked_sub(1)?)),
        BinaryOperator::LessThanOrEqual => Some(NumberRange::at_most(bound)),
        BinaryOperator::GreaterThan => Some(NumberRange::at_least(bound.checked_add(1)?)),
        BinaryOperator::GreaterThanOrEqual => Some(NumberRange::at_least(bound)),
        _ => None,
    }
}

fn learn_pattern(
    state: ProgramState,
    value: OperationId,
    pattern: &Pattern,
    outcome: bool,
) -> Option<ProgramState> {
    let learned = match (pattern, outcome) {
        (Pattern::Null | Pattern::Constant(LiteralValue::Null), true)
        | (Pattern::NotNull, false) => Constraint::NULL,
        (Pattern::Null | Pattern::Constant(LiteralValue::Null), false)
        | (Pattern::NotNull, true)
        | (Pattern::Type(_) | Pattern::Constant(LiteralValue::Str(_)), true) => {
            Constraint::NOT_NULL
        }
        (Pattern::Constant(LiteralValue::Int(n)), true) => Constraint::Range(NumberRange::exact(*n)),
        (Pattern::Constant(LiteralValue::Bool(b)), true) => Constraint::from_bool(*b),
        _ => return Some(state),
    };
    constrain(state, value, learned)
}

/// Constrain the value of `operation`; unevaluated operations learn nothing
fn constrain(state: ProgramState, operation: OperationId, constraint: Constraint) -> Option<ProgramState> {
    match state.operation_value(operation) {
        Some(value) => state.with_constraint(value, constraint),
        None => Some(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_graph::domain::BlockExit;
    use crate::features::flow_graph::infrastructure::RoutineBuilder;
    use crate::features::processors::infrastructure::test_support::{Harness, ROUTINE};
    use crate::features::program_state::domain::BoolConstraint;

    /// Evaluate the entry block (condition included) and split on its branch exit
    fn split_entry(h: &mut Harness, condition: OperationId) -> Vec<BranchSuccessor> {
        let entry = h.b.block();
        let then_block = h.b.block();
        let else_block = h.b.block();
        h.b.branch(entry, condition, then_block, else_block);
        let builder = std::mem::replace(&mut h.b, RoutineBuilder::new(ROUTINE, "test"));
        let body = builder.build().unwrap();
        assert!(matches!(
            body.block(entry).unwrap().exit,
            BlockExit::Branch { .. }
        ));
        let states = h.run_body_from(&body, ProgramState::empty(ROUTINE));
        assert_eq!(states.len(), 1);
        let config = h.config.clone();
        split(&mut h.values, &body, &config, &states[0], condition).unwrap()
    }

    #[test]
    fn test_undecided_condition_forks() {
        let mut h = Harness::new();
        let flag = h.symbols.parameter("flag", false);
        let cond = h.b.parameter(flag);
        let successors = split_entry(&mut h, cond);

        assert_eq!(successors.len(), 2);
        assert!(successors[0].outcome);
        assert!(!successors[1].outcome);
        let value = successors[0].state.symbol_value(flag).unwrap();
        assert_eq!(
            successors[0].state.bool_constraint(value),
            Some(BoolConstraint::True)
        );
        assert_eq!(
            successors[1].state.bool_constraint(value),
            Some(BoolConstraint::False)
        );
    }

    #[test]
    fn test_decided_condition_keeps_one_side() {
        let mut h = Harness::new();
        let one = h.b.int(1);
        let two = h.b.int(2);
        let cond = h.b.binary(BinaryOperator::GreaterThan, one, two);
        let successors = split_entry(&mut h, cond);

        assert_eq!(successors.len(), 1);
        assert!(!successors[0].outcome);
    }

    #[test]
    fn test_null_check_learns_operand_nullness() {
        let mut h = Harness::new();
        let s = h.symbols.parameter("s", true);
        let read = h.b.parameter(s);
        let null = h.b.null();
        let cond = h.b.binary(BinaryOperator::Equals, read, null);
        let successors = split_entry(&mut h, cond);

        assert_eq!(successors.len(), 2);
        let nullness = |i: usize| {
            let state = &successors[i].state;
            state.nullness(state.symbol_value(s).unwrap())
        };
        assert_eq!(nullness(0), Some(ObjectConstraint::Null));
        assert_eq!(nullness(1), Some(ObjectConstraint::NotNull));
    }

    #[test]
    fn test_negated_pattern_learns_through_not() {
        let mut h = Harness::new();
        let o = h.symbols.parameter("o", true);
        let read = h.b.parameter(o);
        let test = h.b.is_pattern(read, Pattern::Null);
        let cond = h.b.not(test);
        let successors = split_entry(&mut h, cond);

        let nullness = |i: usize| {
            let state = &successors[i].state;
            state.nullness(state.symbol_value(o).unwrap())
        };
        // !(o is null) holds → o is not null
        assert_eq!(nullness(0), Some(ObjectConstraint::NotNull));
        assert_eq!(nullness(1), Some(ObjectConstraint::Null));
    }

    #[test]
    fn test_relational_comparison_narrows_range() {
        let mut h = Harness::new();
        let i = h.symbols.local("i");
        let read = h.b.local(i);
        let ten = h.b.int(10);
        let cond = h.b.binary(BinaryOperator::LessThan, read, ten);
        let successors = split_entry(&mut h, cond);

        let range = |k: usize| {
            let state = &successors[k].state;
            state.range(state.symbol_value(i).unwrap())
        };
        assert_eq!(range(0), Some(NumberRange::at_most(9)));
        assert_eq!(range(1), Some(NumberRange::at_least(10)));
    }

    #[test]
    fn test_decided_null_check_keeps_one_side() {
        // s holds a string, so `s == null` is already decided
        let mut h = Harness::new();
        let s = h.symbols.nullable_local("s");
        let text = h.b.string("x");
        let decl = h.b.declare(s, Some(text));
        let read = h.b.local(s);
        let null = h.b.null();
        let cond = h.b.binary(BinaryOperator::Equals, read, null);
        let entry = h.b.block();
        h.b.push(entry, decl);
        let then_block = h.b.block();
        let else_block = h.b.block();
        h.b.branch(entry, cond, then_block, else_block);
        let builder = std::mem::replace(&mut h.b, RoutineBuilder::new(ROUTINE, "test"));
        let body = builder.build().unwrap();
        let states = h.run_body_from(&body, ProgramState::empty(ROUTINE));
        let config = h.config.clone();
        let successors = split(&mut h.values, &body, &config, &states[0], cond).unwrap();

        assert_eq!(successors.len(), 1);
        assert!(!successors[0].outcome);
    }

    #[test]
    fn test_learning_can_be_disabled() {
        let mut h = Harness::new();
        h.config = h.config.clone().learn_branch_constraints(false);
        let s = h.symbols.parameter("s", true);
        let read = h.b.parameter(s);
        let null = h.b.null();
        let cond = h.b.binary(BinaryOperator::Equals, read, null);
        let successors = split_entry(&mut h, cond);

        assert_eq!(successors.len(), 2);
        let state = &successors[0].state;
        assert_eq!(state.nullness(state.symbol_value(s).unwrap()), None);
    }

    #[test]
    fn test_learned_range_contradiction_drops_side() {
        // i is known to be at most 3; `i == 5` can only be false
        let mut h = Harness::new();
        let i = h.symbols.local("i");
        let read = h.b.local(i);
        let five = h.b.int(5);
        let cond = h.b.binary(BinaryOperator::Equals, read, five);
        let body = h.build(&[cond]);

        let states = h.run_body_from(&body, ProgramState::empty(ROUTINE));
        let state = &states[0];
        let value = state.symbol_value(i).unwrap();
        let bounded = state
            .with_constraint(value, Constraint::Range(NumberRange::at_most(3)))
            .unwrap();
        // the comparison was evaluated before the bound was known
        let cond_value = bounded.operation_value(cond).unwrap();
        assert_eq!(bounded.bool_constraint(cond_value), None);

        let config = h.config.clone();
        let successors = split(&mut h.values, &body, &config, &bounded, cond).unwrap();
        assert_eq!(successors.len(), 1);
        assert!(!successors[0].outcome);
    }
}
