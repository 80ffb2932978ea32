//! Immutable program state
//!
//! Four persistent maps: operation → value, symbol → value, value → constraints and
//! capture → captured operation. Every `with_*` returns a new state sharing structure with
//! the old one; published states are never mutated, so they stay valid as dedup keys.
//!
//! Equality and hashing cover all four maps. Two states that bind the same symbols but
//! differ in an operation value or a constraint are different states.

use super::constraint::{
    BoolConstraint, Constraint, ConstraintKind, ConstraintSet, NumberRange, ObjectConstraint,
};
use super::symbolic_value::SymbolicValue;
use crate::shared::models::{CaptureId, OperationId, RoutineId, SymbolId};
use im::{OrdMap, OrdSet};
use std::fmt;
use thiserror::Error;

/// Program state invariant violation (engine bug, fatal for the routine)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("operation {operation} does not belong to routine {routine}")]
    UnknownOperation {
        operation: OperationId,
        routine: RoutineId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramState {
    routine: RoutineId,
    operation_values: OrdMap<OperationId, SymbolicValue>,
    symbol_values: OrdMap<SymbolId, SymbolicValue>,
    constraints: OrdMap<SymbolicValue, ConstraintSet>,
    captures: OrdMap<CaptureId, OperationId>,
}

impl ProgramState {
    /// Entry state of `routine`
    pub fn empty(routine: RoutineId) -> Self {
        Self {
            routine,
            operation_values: OrdMap::new(),
            symbol_values: OrdMap::new(),
            constraints: OrdMap::new(),
            captures: OrdMap::new(),
        }
    }

    fn ensure_owned(&self, operation: OperationId) -> Result<(), StateError> {
        if operation.routine == self.routine {
            Ok(())
        } else {
            Err(StateError::UnknownOperation {
                operation,
                routine: self.routine,
            })
        }
    }

    // ------------------------------------------------------------------
    // Operation values
    // ------------------------------------------------------------------

    pub fn with_operation_value(
        &self,
        operation: OperationId,
        value: SymbolicValue,
    ) -> Result<Self, StateError> {
        self.ensure_owned(operation)?;
        Ok(Self {
            operation_values: self.operation_values.update(operation, value),
            ..self.clone()
        })
    }

    pub fn operation_value(&self, operation: OperationId) -> Option<SymbolicValue> {
        self.operation_values.get(&operation).copied()
    }

    // ------------------------------------------------------------------
    // Symbol values
    // ------------------------------------------------------------------

    pub fn with_symbol_value(&self, symbol: SymbolId, value: SymbolicValue) -> Self {
        Self {
            symbol_values: self.symbol_values.update(symbol, value),
            ..self.clone()
        }
    }

    pub fn without_symbol_value(&self, symbol: SymbolId) -> Self {
        if !self.symbol_values.contains_key(&symbol) {
            return self.clone();
        }
        Self {
            symbol_values: self.symbol_values.without(&symbol),
            ..self.clone()
        }
    }

    pub fn symbol_value(&self, symbol: SymbolId) -> Option<SymbolicValue> {
        self.symbol_values.get(&symbol).copied()
    }

    /// Tracked symbols in id order
    pub fn symbol_values(&self) -> impl Iterator<Item = (SymbolId, SymbolicValue)> + '_ {
        self.symbol_values.iter().map(|(s, v)| (*s, *v))
    }

    // ------------------------------------------------------------------
    // Constraints
    // ------------------------------------------------------------------

    /// Add a constraint; `None` means the path is infeasible
    pub fn with_constraint(&self, value: SymbolicValue, constraint: Constraint) -> Option<Self> {
        let current = self.constraints(value);
        let next = current.with(constraint)?;
        if next == current {
            return Some(self.clone());
        }
        Some(Self {
            constraints: self.constraints.update(value, next),
            ..self.clone()
        })
    }

    /// Add every constraint in order; `None` as soon as one contradicts
    pub fn with_constraints(
        &self,
        value: SymbolicValue,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Option<Self> {
        constraints
            .into_iter()
            .try_fold(self.clone(), |state, c| state.with_constraint(value, c))
    }

    /// Constraints of `value`; empty when unconstrained
    pub fn constraints(&self, value: SymbolicValue) -> ConstraintSet {
        self.constraints.get(&value).copied().unwrap_or_default()
    }

    /// Typed lookup: `state.constraint::<BoolConstraint>(v)`
    pub fn constraint<K: ConstraintKind>(&self, value: SymbolicValue) -> Option<K> {
        K::from_set(&self.constraints(value))
    }

    pub fn bool_constraint(&self, value: SymbolicValue) -> Option<BoolConstraint> {
        self.constraints(value).bool
    }

    pub fn nullness(&self, value: SymbolicValue) -> Option<ObjectConstraint> {
        self.constraints(value).nullness()
    }

    pub fn range(&self, value: SymbolicValue) -> Option<NumberRange> {
        self.constraints(value).range
    }

    // ------------------------------------------------------------------
    // Flow captures
    // ------------------------------------------------------------------

    pub fn with_capture(
        &self,
        capture: CaptureId,
        operation: OperationId,
    ) -> Result<Self, StateError> {
        self.ensure_owned(operation)?;
        Ok(Self {
            captures: self.captures.update(capture, operation),
            ..self.clone()
        })
    }

    pub fn capture(&self, capture: CaptureId) -> Option<OperationId> {
        self.captures.get(&capture).copied()
    }

    // ------------------------------------------------------------------
    // Block-boundary hygiene
    // ------------------------------------------------------------------

    /// Forget operation values except captured ones, then drop constraints of values
    /// nothing refers to anymore
    pub fn reset_operations(&self) -> Self {
        let captured: OrdSet<OperationId> = self.captures.values().copied().collect();
        let operation_values: OrdMap<OperationId, SymbolicValue> = self
            .operation_values
            .iter()
            .filter(|(op, _)| captured.contains(op))
            .map(|(op, v)| (*op, *v))
            .collect();

        let live: OrdSet<SymbolicValue> = operation_values
            .values()
            .chain(self.symbol_values.values())
            .copied()
            .collect();
        let constraints: OrdMap<SymbolicValue, ConstraintSet> = self
            .constraints
            .iter()
            .filter(|(v, _)| live.contains(v))
            .map(|(v, c)| (*v, *c))
            .collect();

        Self {
            operation_values,
            constraints,
            ..self.clone()
        }
    }
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbols:")?;
        for (symbol, value) in &self.symbol_values {
            writeln!(f, "  {}: {}", symbol, value)?;
        }
        writeln!(f, "Constraints:")?;
        for (value, set) in &self.constraints {
            writeln!(f, "  {}: {}", value, set)?;
        }
        writeln!(f, "Operations:")?;
        for (operation, value) in &self.operation_values {
            writeln!(f, "  {}: {}", operation, value)?;
        }
        if !self.captures.is_empty() {
            writeln!(f, "Captures:")?;
            for (capture, operation) in &self.captures {
                writeln!(f, "  {}: {}", capture, operation)?;
            }
        }
        Ok(())
    }
}
