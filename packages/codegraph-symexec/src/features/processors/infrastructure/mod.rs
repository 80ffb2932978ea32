/*
 * Built-in Processors
 *
 * One module per operation family:
 * - literal: constants, `this`, opaque expressions
 * - references: locals, parameters, fields, array elements, captures, pass-through
 * - assignment: simple/compound assignment, increment/decrement
 * - declaration: variable declarators
 * - binary: binary/unary operators with constant folding
 * - invocation: calls and object creation (invalidation)
 * - pattern: type tests and pattern matches
 * - branch: conditional branch splitting (driven by the walker)
 */

pub mod assignment;
pub mod binary;
pub mod branch;
pub mod declaration;
pub mod invocation;
pub mod literal;
pub mod pattern;
pub mod references;

#[cfg(test)]
pub(crate) mod test_support;

pub use branch::{split, BranchSuccessor};
