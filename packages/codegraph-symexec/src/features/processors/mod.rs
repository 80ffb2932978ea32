/*
 * Operation Processors
 *
 * Semantics of each operation kind as a pure function
 * `(SymbolicContext) -> Vec<ProgramState>`:
 * - Domain: `SymbolicContext`, `ProcessorError`, `ValueFactory`
 * - Application: `ProcessorRegistry` (operation tag → processor chain)
 * - Infrastructure: the built-in processors and the branch splitter
 *
 * An empty successor list is an infeasible path. `ProcessorError::UnsupportedShape` makes
 * the walker skip the operation; `ProcessorError::State` aborts the routine.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ProcessorRegistry;
pub use domain::{
    Processor, ProcessorError, ProcessorResult, SymbolicContext, ValueFactory, ValueKey,
};
pub use infrastructure::{split, BranchSuccessor};
