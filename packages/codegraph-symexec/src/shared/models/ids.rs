//! Stable identifiers shared by every feature
//!
//! All ids are plain `Copy` newtypes so program states can key persistent maps on them
//! without allocation. `OperationId` carries its routine so a state can reject operations
//! from a different routine body.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Routine (method / function / lambda body) identifier, assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoutineId(pub u32);

/// Operation identifier: index into the owning routine's operation arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId {
    pub routine: RoutineId,
    pub index: u32,
}

impl OperationId {
    pub fn new(routine: RoutineId, index: u32) -> Self {
        Self { routine, index }
    }
}

/// Storage location identity (local, parameter, field) from the host semantic model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Basic block identifier: index into the routine's block list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Flow capture identifier (compiler temporaries shared between blocks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureId(pub u32);

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#op{}", self.routine, self.index)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

impl fmt::Display for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let op = OperationId::new(RoutineId(2), 7);
        assert_eq!(op.to_string(), "R2#op7");
        assert_eq!(BlockId(3).to_string(), "B3");
        assert_eq!(SymbolId(1).to_string(), "sym1");
        assert_eq!(CaptureId(0).to_string(), "capture0");
    }

    #[test]
    fn test_operation_ids_order_by_routine_first() {
        let a = OperationId::new(RoutineId(0), 9);
        let b = OperationId::new(RoutineId(1), 0);
        assert!(a < b);
    }
}
