//! Position inside a routine's control-flow graph

use super::ids::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `index` walks the block's operations in execution order; `index == len` is the exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramPoint {
    pub block: BlockId,
    pub index: usize,
}

impl ProgramPoint {
    pub fn new(block: BlockId, index: usize) -> Self {
        Self { block, index }
    }

    /// First position of `block`
    pub fn entry(block: BlockId) -> Self {
        Self::new(block, 0)
    }

    pub fn next(&self) -> Self {
        Self::new(self.block, self.index + 1)
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ordering_and_display() {
        let a = ProgramPoint::entry(BlockId(1));
        let b = a.next();
        assert!(a < b);
        assert!(ProgramPoint::entry(BlockId(0)) < a);
        assert_eq!(b.to_string(), "B1:1");
    }
}
