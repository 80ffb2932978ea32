/*
 * Program State
 *
 * Immutable snapshot of everything the engine knows at one exploration point:
 * - operation → symbolic value (value numbering of evaluated operations)
 * - symbol → symbolic value (current binding of tracked storage locations)
 * - symbolic value → constraints (nullness, boolean outcome, numeric range)
 * - flow capture → captured operation
 *
 * Backed by `im::OrdMap`, so deriving a state is O(log n) and structural equality and
 * hashing are deterministic for duplicate detection.
 */

pub mod domain;

pub use domain::{
    BoolConstraint, Constraint, ConstraintKind, ConstraintSet, NumberRange, ObjectConstraint,
    ProgramState, StateError, SymbolicValue,
};
