/*
 * Built-in Checks
 *
 * - NullDereferenceCheck: receiver constrained `Null` at a call, field or array access
 * - UselessIncrementCheck: `x = x++` / `x = x--` on the same tracked symbol
 */

mod null_dereference;
mod useless_increment;

pub use null_dereference::NullDereferenceCheck;
pub use useless_increment::UselessIncrementCheck;
