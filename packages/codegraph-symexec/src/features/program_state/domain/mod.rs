/*
 * Program State Domain Models
 *
 * Symbolic values, constraints and the immutable program state.
 */

mod constraint;
mod program_state;
mod symbolic_value;

pub use constraint::{
    BoolConstraint, Constraint, ConstraintKind, ConstraintSet, NumberRange, ObjectConstraint,
};
pub use program_state::{ProgramState, StateError};
pub use symbolic_value::SymbolicValue;
