/*
 * Processor Domain
 *
 * Calling convention shared by all processors and the per-exploration value factory.
 */

mod context;
mod value_factory;

pub use context::{
    dereference, successors, Processor, ProcessorError, ProcessorResult, SymbolicContext,
};
pub use value_factory::{ValueFactory, ValueKey};
