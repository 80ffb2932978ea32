/*
 * Codegraph Symexec - Path-Sensitive Symbolic Execution
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (ids, program points)
 * - config/      : Preset + builder + YAML exploration limits
 * - features/    : flow_graph → program_state → capture → processors → checks → exploration
 *
 * Explores the exploded graph (program point × program state) of one routine at a time,
 * forking states at undecided branches and pruning contradictory paths. Checks observe
 * every published state and report path-sensitive findings.
 *
 * Performance:
 * - Persistent `im` maps for cheap state derivation
 * - Rayon fan-out over independent routines (feature `parallel`)
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::{ConfigError, ExplorationConfig, Preset};
pub use errors::{Result, SymexecError};
pub use features::capture::resolve_capture;
pub use features::checks::{
    CheckContext, Finding, FindingSeverity, FindingSink, NullDereferenceCheck, SymbolicCheck,
    UselessIncrementCheck,
};
pub use features::exploration::{
    CancellationToken, ExplorationOutcome, ExplorationStats, IncompleteReason, RoutineReport,
    SymbolicEngine,
};
pub use features::flow_graph::{
    Argument, ArgumentKind, BinaryOperator, BlockExit, GraphError, LiteralValue, OperationKind,
    OperationTag, Pattern, RoutineBody, RoutineBuilder, SemanticModel, SymbolInfo, SymbolKind,
    SymbolTable, UnaryOperator,
};
pub use features::processors::{Processor, ProcessorError, ProcessorResult, SymbolicContext};
pub use features::program_state::{
    BoolConstraint, Constraint, ConstraintSet, NumberRange, ObjectConstraint, ProgramState,
    StateError, SymbolicValue,
};
pub use shared::models::{BlockId, CaptureId, OperationId, ProgramPoint, RoutineId, SymbolId};
