//! Processor registry
//!
//! Operation tag → ordered processor list, resolved once when the engine is built.
//! When several processors are registered for one tag they run as a chain: each one is
//! applied to every successor of the previous one.

use crate::features::flow_graph::domain::OperationTag;
use crate::features::processors::domain::{Processor, ProcessorResult, SymbolicContext};
use crate::features::processors::infrastructure::{
    assignment, binary, declaration, invocation, literal, pattern, references,
};
use rustc_hash::FxHashMap;

#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: FxHashMap<OperationTag, Vec<Processor>>,
}

impl ProcessorRegistry {
    /// Empty registry (every operation is unsupported)
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in semantics for every operation kind
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(OperationTag::Literal, literal::process_literal);
        registry.register(
            OperationTag::InstanceReference,
            literal::process_instance_reference,
        );
        registry.register(OperationTag::Other, literal::process_opaque);

        registry.register(OperationTag::LocalReference, references::process_symbol_reference);
        registry.register(
            OperationTag::ParameterReference,
            references::process_symbol_reference,
        );
        registry.register(OperationTag::FieldReference, references::process_field_reference);
        registry.register(
            OperationTag::ArrayElementReference,
            references::process_array_element,
        );
        registry.register(OperationTag::Parenthesized, references::process_pass_through);
        registry.register(OperationTag::Conversion, references::process_pass_through);
        registry.register(OperationTag::FlowCapture, references::process_flow_capture);
        registry.register(
            OperationTag::FlowCaptureReference,
            references::process_flow_capture_reference,
        );

        registry.register(OperationTag::SimpleAssignment, assignment::process_assignment);
        registry.register(
            OperationTag::CompoundAssignment,
            assignment::process_compound_assignment,
        );
        registry.register(OperationTag::Increment, assignment::process_increment);
        registry.register(
            OperationTag::VariableDeclarator,
            declaration::process_declarator,
        );

        registry.register(OperationTag::Binary, binary::process_binary);
        registry.register(OperationTag::Unary, binary::process_unary);

        registry.register(OperationTag::Invocation, invocation::process_invocation);
        registry.register(
            OperationTag::ObjectCreation,
            invocation::process_object_creation,
        );

        registry.register(OperationTag::IsType, pattern::process_is_type);
        registry.register(OperationTag::IsPattern, pattern::process_is_pattern);
        registry
    }

    /// Append a processor to the chain of `tag`
    pub fn register(&mut self, tag: OperationTag, processor: Processor) {
        self.processors.entry(tag).or_default().push(processor);
    }

    pub fn supports(&self, tag: OperationTag) -> bool {
        self.processors.get(&tag).map_or(false, |p| !p.is_empty())
    }

    /// Run the processor chain for the context's operation
    pub fn process(&self, ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
        let chain = match self.processors.get(&ctx.operation.tag()) {
            Some(chain) if !chain.is_empty() => chain,
            _ => return Err(ctx.unsupported("no processor registered")),
        };

        let mut states = chain[0](ctx)?;
        for processor in &chain[1..] {
            let mut next = Vec::with_capacity(states.len());
            for state in &states {
                let mut link = SymbolicContext {
                    operation: ctx.operation,
                    state,
                    routine: ctx.routine,
                    semantic: ctx.semantic,
                    values: &mut *ctx.values,
                    config: ctx.config,
                };
                next.extend(processor(&mut link)?);
            }
            states = next;
        }
        Ok(states)
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self
            .processors
            .iter()
            .map(|(tag, chain)| (*tag, chain.len()))
            .collect();
        tags.sort();
        f.debug_struct("ProcessorRegistry")
            .field("processors", &tags)
            .finish()
    }
}
