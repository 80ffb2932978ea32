//! Shared models used across features

mod ids;
mod program_point;

pub use ids::{BlockId, CaptureId, OperationId, RoutineId, SymbolId};
pub use program_point::ProgramPoint;
