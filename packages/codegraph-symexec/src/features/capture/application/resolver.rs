//! Write-target resolution
//!
//! Pure and idempotent: resolving the same target against the same state always yields
//! the same symbol, and resolution never changes the state.

use crate::features::flow_graph::domain::{OperationKind, RoutineBody};
use crate::features::program_state::domain::ProgramState;
use crate::shared::models::{OperationId, SymbolId};
use rustc_hash::FxHashSet;

impl ProgramState {
    /// Symbol affected by writing through `target`, if it can be tracked
    pub fn resolve_capture(&self, routine: &RoutineBody, target: OperationId) -> Option<SymbolId> {
        resolve_capture(self, routine, target)
    }
}

pub fn resolve_capture(
    state: &ProgramState,
    routine: &RoutineBody,
    target: OperationId,
) -> Option<SymbolId> {
    let symbol = resolve_storage(state, routine, target)?;
    follow_closure_captures(routine, symbol)
}

fn resolve_storage(
    state: &ProgramState,
    routine: &RoutineBody,
    target: OperationId,
) -> Option<SymbolId> {
    let mut seen = FxHashSet::default();
    let mut current = target;
    loop {
        if !seen.insert(current) {
            return None;
        }
        match &routine.operation(current)?.kind {
            OperationKind::Parenthesized(inner) | OperationKind::Conversion(inner) => {
                current = *inner;
            }
            OperationKind::FlowCaptureReference(capture) => {
                current = state.capture(*capture)?;
            }
            OperationKind::LocalReference(symbol) | OperationKind::ParameterReference(symbol) => {
                return Some(*symbol);
            }
            OperationKind::FieldReference {
                instance: None,
                field,
            } => return Some(*field),
            OperationKind::FieldReference {
                instance: Some(instance),
                field,
            } => return is_this(routine, *instance).then_some(*field),
            _ => return None,
        }
    }
}

fn is_this(routine: &RoutineBody, operation: OperationId) -> bool {
    let mut current = operation;
    // Operation trees are acyclic (validated by RoutineBody::new)
    loop {
        match routine.operation(current).map(|op| &op.kind) {
            Some(OperationKind::Parenthesized(inner)) | Some(OperationKind::Conversion(inner)) => {
                current = *inner;
            }
            Some(OperationKind::InstanceReference) => return true,
            _ => return false,
        }
    }
}

/// Walk inner → outer until a symbol owns its storage; a cycle yields `None`
fn follow_closure_captures(routine: &RoutineBody, symbol: SymbolId) -> Option<SymbolId> {
    let mut seen = FxHashSet::default();
    let mut current = symbol;
    while let Some(outer) = routine.closure_capture(current) {
        if !seen.insert(current) {
            return None;
        }
        current = outer;
    }
    Some(current)
}
