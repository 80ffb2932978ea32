/*
 * Exploration
 *
 * Drives processors and checks over the exploded graph of a routine:
 * - Domain: `CancellationToken`, `ExplorationOutcome`, `ExplorationStats`, `RoutineReport`
 * - Application: `Walker` (one routine, work-list driven), `SymbolicEngine` (entry point,
 *   optional rayon fan-out over routines)
 *
 * Termination: every routine is bounded by `max_visited_pairs` and `max_steps`.
 */

pub mod application;
pub mod domain;

pub use application::{SymbolicEngine, Walker};
pub use domain::{
    CancellationToken, ExplorationOutcome, ExplorationStats, IncompleteReason, RoutineReport,
};
