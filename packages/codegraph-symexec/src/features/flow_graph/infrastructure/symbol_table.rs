//! In-memory semantic model
//!
//! Used by host adapters that already resolved their symbols, and by tests.

use crate::features::flow_graph::ports::{SemanticModel, SymbolInfo, SymbolKind};
use crate::shared::models::SymbolId;

/// Dense symbol table: `SymbolId(n)` is the n-th declared symbol
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a symbol and return its id
    pub fn declare(&mut self, name: impl Into<String>, kind: SymbolKind, nullable: bool) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolInfo {
            id,
            name: name.into(),
            kind,
            nullable,
        });
        id
    }

    /// Non-nullable local (`int x`)
    pub fn local(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(name, SymbolKind::Local, false)
    }

    /// Nullable local (`string s`, `object o`)
    pub fn nullable_local(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(name, SymbolKind::Local, true)
    }

    pub fn parameter(&mut self, name: impl Into<String>, nullable: bool) -> SymbolId {
        self.declare(name, SymbolKind::Parameter, nullable)
    }

    pub fn field(&mut self, name: impl Into<String>, is_static: bool, nullable: bool) -> SymbolId {
        self.declare(name, SymbolKind::Field { is_static }, nullable)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SemanticModel for SymbolTable {
    fn symbol(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_assigns_dense_ids() {
        let mut table = SymbolTable::new();
        let x = table.local("x");
        let s = table.nullable_local("s");
        let f = table.field("count", false, false);

        assert_eq!(x, SymbolId(0));
        assert_eq!(s, SymbolId(1));
        assert_eq!(table.len(), 3);

        assert!(!table.symbol(x).unwrap().nullable);
        assert!(table.symbol(s).unwrap().nullable);
        assert!(table.symbol(f).unwrap().is_field());
        assert!(!table.symbol(f).unwrap().is_static_field());
        assert!(table.symbol(SymbolId(42)).is_none());
    }

    #[test]
    fn test_symbol_name_falls_back_to_id() {
        let table = SymbolTable::new();
        assert_eq!(table.symbol_name(SymbolId(3)), "sym3");
    }
}
