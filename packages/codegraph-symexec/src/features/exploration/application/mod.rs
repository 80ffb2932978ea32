mod engine;
mod walker;

pub use engine::SymbolicEngine;
pub use walker::Walker;
