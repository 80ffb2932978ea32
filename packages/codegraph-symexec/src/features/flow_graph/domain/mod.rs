/*
 * Flow Graph Domain Models
 *
 * Host-supplied routine bodies: basic blocks, block exits and the operation tree.
 */

mod operation;
mod routine;

pub use operation::{
    Argument, ArgumentKind, BinaryOperator, LiteralValue, Operation, OperationKind, OperationTag,
    Pattern, UnaryOperator,
};
pub use routine::{BasicBlock, BlockExit, GraphError, RoutineBody};
