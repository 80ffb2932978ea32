/*
 * Flow Graph Infrastructure
 *
 * In-memory semantic model and routine builder.
 */

mod routine_builder;
mod symbol_table;

pub use routine_builder::RoutineBuilder;
pub use symbol_table::SymbolTable;
