//! Routine body builder
//!
//! Fluent construction of operation arenas and basic blocks for host adapters that do not
//! produce `RoutineBody` directly, and for tests.
//!
//! # Example
//! ```rust,ignore
//! // int x = 0; x = x + 1;
//! let mut b = RoutineBuilder::new(RoutineId(0), "increment");
//! let entry = b.block();
//! let zero = b.int(0);
//! let decl = b.declare(x, Some(zero));
//! let read = b.local(x);
//! let one = b.int(1);
//! let sum = b.binary(BinaryOperator::Add, read, one);
//! let target = b.local(x);
//! let assign = b.assign(target, sum);
//! b.push(entry, decl);
//! b.push(entry, assign);
//! b.exit(entry, BlockExit::Return(None));
//! let body = b.build()?;
//! ```

use crate::features::flow_graph::domain::{
    Argument, BasicBlock, BinaryOperator, BlockExit, GraphError, LiteralValue, Operation,
    OperationKind, Pattern, RoutineBody, UnaryOperator,
};
use crate::shared::models::{BlockId, CaptureId, OperationId, RoutineId, SymbolId};

pub struct RoutineBuilder {
    routine: RoutineId,
    name: String,
    operations: Vec<Operation>,
    blocks: Vec<BasicBlock>,
    closure_captures: Vec<(SymbolId, SymbolId)>,
}

impl RoutineBuilder {
    pub fn new(routine: RoutineId, name: impl Into<String>) -> Self {
        Self {
            routine,
            name: name.into(),
            operations: Vec::new(),
            blocks: Vec::new(),
            closure_captures: Vec::new(),
        }
    }

    /// Append an operation to the arena
    pub fn add(&mut self, kind: OperationKind) -> OperationId {
        let id = OperationId::new(self.routine, self.operations.len() as u32);
        self.operations.push(Operation::new(id, kind));
        id
    }

    /// Attach a source line to an operation
    pub fn at_line(&mut self, operation: OperationId, line: u32) -> OperationId {
        if let Some(op) = self.operations.get_mut(operation.index as usize) {
            op.line = Some(line);
        }
        operation
    }

    pub fn int(&mut self, value: i64) -> OperationId {
        self.add(OperationKind::Literal(LiteralValue::Int(value)))
    }

    pub fn boolean(&mut self, value: bool) -> OperationId {
        self.add(OperationKind::Literal(LiteralValue::Bool(value)))
    }

    pub fn string(&mut self, value: impl Into<String>) -> OperationId {
        self.add(OperationKind::Literal(LiteralValue::Str(value.into())))
    }

    pub fn null(&mut self) -> OperationId {
        self.add(OperationKind::Literal(LiteralValue::Null))
    }

    pub fn local(&mut self, symbol: SymbolId) -> OperationId {
        self.add(OperationKind::LocalReference(symbol))
    }

    pub fn parameter(&mut self, symbol: SymbolId) -> OperationId {
        self.add(OperationKind::ParameterReference(symbol))
    }

    pub fn field(&mut self, instance: Option<OperationId>, field: SymbolId) -> OperationId {
        self.add(OperationKind::FieldReference { instance, field })
    }

    pub fn this(&mut self) -> OperationId {
        self.add(OperationKind::InstanceReference)
    }

    pub fn element(&mut self, array: OperationId, index: OperationId) -> OperationId {
        self.add(OperationKind::ArrayElementReference { array, index })
    }

    pub fn paren(&mut self, inner: OperationId) -> OperationId {
        self.add(OperationKind::Parenthesized(inner))
    }

    pub fn convert(&mut self, inner: OperationId) -> OperationId {
        self.add(OperationKind::Conversion(inner))
    }

    pub fn capture(&mut self, id: CaptureId, value: OperationId) -> OperationId {
        self.add(OperationKind::FlowCapture { id, value })
    }

    pub fn capture_ref(&mut self, id: CaptureId) -> OperationId {
        self.add(OperationKind::FlowCaptureReference(id))
    }

    pub fn assign(&mut self, target: OperationId, value: OperationId) -> OperationId {
        self.add(OperationKind::SimpleAssignment { target, value })
    }

    pub fn compound(
        &mut self,
        operator: BinaryOperator,
        target: OperationId,
        value: OperationId,
    ) -> OperationId {
        self.add(OperationKind::CompoundAssignment {
            target,
            value,
            operator,
        })
    }

    pub fn increment(&mut self, target: OperationId, postfix: bool) -> OperationId {
        self.add(OperationKind::Increment {
            target,
            decrement: false,
            postfix,
        })
    }

    pub fn decrement(&mut self, target: OperationId, postfix: bool) -> OperationId {
        self.add(OperationKind::Increment {
            target,
            decrement: true,
            postfix,
        })
    }

    pub fn declare(&mut self, symbol: SymbolId, initializer: Option<OperationId>) -> OperationId {
        self.add(OperationKind::VariableDeclarator {
            symbol,
            initializer,
        })
    }

    pub fn binary(
        &mut self,
        operator: BinaryOperator,
        left: OperationId,
        right: OperationId,
    ) -> OperationId {
        self.add(OperationKind::Binary {
            operator,
            left,
            right,
        })
    }

    pub fn not(&mut self, operand: OperationId) -> OperationId {
        self.add(OperationKind::Unary {
            operator: UnaryOperator::Not,
            operand,
        })
    }

    pub fn negate(&mut self, operand: OperationId) -> OperationId {
        self.add(OperationKind::Unary {
            operator: UnaryOperator::Negate,
            operand,
        })
    }

    pub fn invoke(
        &mut self,
        instance: Option<OperationId>,
        method: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> OperationId {
        self.add(OperationKind::Invocation {
            instance,
            method: method.into(),
            arguments,
        })
    }

    pub fn new_object(&mut self, type_name: impl Into<String>, arguments: Vec<Argument>) -> OperationId {
        self.add(OperationKind::ObjectCreation {
            type_name: type_name.into(),
            arguments,
        })
    }

    pub fn is_type(&mut self, value: OperationId, type_name: impl Into<String>) -> OperationId {
        self.add(OperationKind::IsType {
            value,
            type_name: type_name.into(),
        })
    }

    pub fn is_pattern(&mut self, value: OperationId, pattern: Pattern) -> OperationId {
        self.add(OperationKind::IsPattern { value, pattern })
    }

    pub fn other(&mut self, description: impl Into<String>) -> OperationId {
        self.add(OperationKind::Other(description.into()))
    }

    /// New empty block ending in `Return(None)` until `exit` is called
    pub fn block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock::new(id, BlockExit::Return(None)));
        id
    }

    /// Append a root operation (statement) to a block
    pub fn push(&mut self, block: BlockId, operation: OperationId) {
        if let Some(b) = self.blocks.get_mut(block.0 as usize) {
            b.operations.push(operation);
        }
    }

    pub fn exit(&mut self, block: BlockId, exit: BlockExit) {
        if let Some(b) = self.blocks.get_mut(block.0 as usize) {
            b.exit = exit;
        }
    }

    pub fn goto(&mut self, block: BlockId, target: BlockId) {
        self.exit(block, BlockExit::Goto(target));
    }

    pub fn branch(&mut self, block: BlockId, condition: OperationId, when_true: BlockId, when_false: BlockId) {
        self.exit(
            block,
            BlockExit::Branch {
                condition,
                when_true,
                when_false,
            },
        );
    }

    pub fn handler(&mut self, block: BlockId, handler: BlockId) {
        if let Some(b) = self.blocks.get_mut(block.0 as usize) {
            b.exception_handler = Some(handler);
        }
    }

    /// Declare that `inner` (lambda-local view) shares storage with `outer`
    pub fn closure_capture(&mut self, inner: SymbolId, outer: SymbolId) {
        self.closure_captures.push((inner, outer));
    }

    pub fn build(self) -> Result<RoutineBody, GraphError> {
        RoutineBody::new(
            self.routine,
            self.name,
            self.blocks,
            self.operations,
            self.closure_captures,
        )
    }
}
