//! Symbolic value token

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token standing for "the value produced here"
///
/// Equality of tokens is equality of runtime values; distinct tokens may still be equal
/// at runtime unless constraints say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolicValue(pub u32);

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SV_{}", self.0)
    }
}
