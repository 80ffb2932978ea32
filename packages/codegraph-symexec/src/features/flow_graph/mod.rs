/*
 * Flow Graph Input Model
 *
 * The routine body handed over by the host compiler integration:
 * - Domain: operations, basic blocks, block exits, validated `RoutineBody`
 * - Ports: `SemanticModel` symbol lookup
 * - Infrastructure: `SymbolTable`, `RoutineBuilder`
 *
 * Blocks are indexed densely (`BlockId(n)` is the n-th block, block 0 is the entry) and
 * every operation belongs to exactly one routine arena.
 */

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{
    Argument, ArgumentKind, BasicBlock, BinaryOperator, BlockExit, GraphError, LiteralValue,
    Operation, OperationKind, OperationTag, Pattern, RoutineBody, UnaryOperator,
};
pub use infrastructure::{RoutineBuilder, SymbolTable};
pub use ports::{SemanticModel, SymbolInfo, SymbolKind};
