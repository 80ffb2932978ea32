//! Processor calling convention
//!
//! A processor is a plain function from a `SymbolicContext` to the successor states of
//! one operation. An empty successor list means the operation cannot execute in the
//! incoming state (infeasible path).

use super::value_factory::ValueFactory;
use crate::config::ExplorationConfig;
use crate::features::flow_graph::domain::{Operation, OperationTag, RoutineBody};
use crate::features::flow_graph::ports::SemanticModel;
use crate::features::program_state::domain::{Constraint, ProgramState, StateError, SymbolicValue};
use crate::shared::models::OperationId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// Operation shape the engine has no semantics for; the walker skips it
    #[error("unsupported operation {operation} ({tag:?}): {reason}")]
    UnsupportedShape {
        operation: OperationId,
        tag: OperationTag,
        reason: String,
    },

    /// Program state invariant violated; aborts the routine
    #[error(transparent)]
    State(#[from] StateError),
}

pub type ProcessorResult = Result<Vec<ProgramState>, ProcessorError>;

/// Semantics of one operation kind
pub type Processor = fn(&mut SymbolicContext<'_>) -> ProcessorResult;

/// Everything a processor may look at while evaluating one operation
pub struct SymbolicContext<'a> {
    pub operation: &'a Operation,
    pub state: &'a ProgramState,
    pub routine: &'a RoutineBody,
    pub semantic: &'a dyn SemanticModel,
    pub values: &'a mut ValueFactory,
    pub config: &'a ExplorationConfig,
}

impl<'a> SymbolicContext<'a> {
    pub fn unsupported(&self, reason: impl Into<String>) -> ProcessorError {
        ProcessorError::UnsupportedShape {
            operation: self.operation.id,
            tag: self.operation.tag(),
            reason: reason.into(),
        }
    }

    /// Value of an already evaluated child
    ///
    /// A child the engine could not evaluate stands for an unknown value, so it gets a
    /// fresh one rather than failing the parent.
    pub fn operand(
        &mut self,
        state: ProgramState,
        operation: OperationId,
    ) -> Result<(ProgramState, SymbolicValue), ProcessorError> {
        match state.operation_value(operation) {
            Some(value) => Ok((state, value)),
            None => {
                let value = self.values.fresh();
                tracing::trace!(operation = %operation, value = %value, "unevaluated operand");
                Ok((state.with_operation_value(operation, value)?, value))
            }
        }
    }

    /// Record the value of the operation being processed
    pub fn bind(
        &self,
        state: &ProgramState,
        value: SymbolicValue,
    ) -> Result<ProgramState, StateError> {
        state.with_operation_value(self.operation.id, value)
    }
}

/// Learn `NotNull` on a dereferenced value unless it is already known to be null
///
/// A `Null` receiver is left as is so checks observing the post-state can report it.
pub fn dereference(state: ProgramState, value: SymbolicValue) -> ProgramState {
    match state.with_constraint(value, Constraint::NOT_NULL) {
        Some(next) => next,
        None => state,
    }
}

/// Successor list for an optional (possibly infeasible) state
pub fn successors(state: Option<ProgramState>) -> ProcessorResult {
    Ok(state.into_iter().collect())
}
