/*
 * Symbolic Checks
 *
 * Path-sensitive rules plugged into the exploration walker:
 * - Ports: `SymbolicCheck`, `CheckContext`
 * - Domain: `Finding`, `FindingSink`, `FindingCollector`
 * - Infrastructure: built-in null dereference and useless increment checks
 */

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{Finding, FindingCollector, FindingSeverity, FindingSink};
pub use infrastructure::{NullDereferenceCheck, UselessIncrementCheck};
pub use ports::{CheckContext, SymbolicCheck};
