/*
 * Flow Graph Ports
 *
 * Semantic lookup capability consumed from the host compiler integration.
 */

use crate::shared::models::SymbolId;
use serde::{Deserialize, Serialize};

/// Storage location category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field { is_static: bool },
    Other,
}

/// Declared shape of a symbol, as far as processors need it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    /// Declared type admits `null`
    pub nullable: bool,
}

impl SymbolInfo {
    pub fn is_field(&self) -> bool {
        matches!(self.kind, SymbolKind::Field { .. })
    }

    pub fn is_static_field(&self) -> bool {
        matches!(self.kind, SymbolKind::Field { is_static: true })
    }
}

/// Host semantic model (symbol table) shared read-only between routine workers
pub trait SemanticModel: Send + Sync {
    /// Resolve a symbol; `None` for symbols the host does not describe
    fn symbol(&self, id: SymbolId) -> Option<&SymbolInfo>;

    /// Display name for messages
    fn symbol_name(&self, id: SymbolId) -> String {
        self.symbol(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
