//! Symbolic value numbering
//!
//! One factory per routine exploration. Values that denote the same computation over the
//! same inputs are interned, so re-evaluating `x + 1` with the same `x` yields the same
//! token on every path. Unknowns (call results, allocations, array reads) are always fresh.

use crate::features::flow_graph::domain::{BinaryOperator, LiteralValue, Pattern, UnaryOperator};
use crate::features::program_state::domain::SymbolicValue;
use rustc_hash::FxHashMap;

/// Identity of an interned value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Literal(LiteralValue),
    /// `this`
    Instance,
    Binary(BinaryOperator, SymbolicValue, SymbolicValue),
    Unary(UnaryOperator, SymbolicValue),
    Pattern(Pattern, SymbolicValue),
    TypeTest(String, SymbolicValue),
}

#[derive(Debug, Default)]
pub struct ValueFactory {
    next: u32,
    interned: FxHashMap<ValueKey, SymbolicValue>,
}

impl ValueFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A value distinct from every value created before
    pub fn fresh(&mut self) -> SymbolicValue {
        let value = SymbolicValue(self.next);
        self.next += 1;
        value
    }

    /// The value for `key`, created on first use
    pub fn intern(&mut self, key: ValueKey) -> SymbolicValue {
        if let Some(value) = self.interned.get(&key) {
            return *value;
        }
        let value = self.fresh();
        self.interned.insert(key, value);
        value
    }

    /// Number of values handed out so far
    pub fn created(&self) -> usize {
        self.next as usize
    }
}
