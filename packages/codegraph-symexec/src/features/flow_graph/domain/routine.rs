//! Routine body: basic blocks over an operation arena
//!
//! The host hands over one `RoutineBody` per method/lambda. Construction validates every
//! cross reference once, so the walker can index blocks and operations without re-checking,
//! and precomputes each block's execution order (children before parents, block exit last).

use super::operation::{ArgumentKind, Operation, OperationKind};
use crate::shared::models::{BlockId, OperationId, RoutineId, SymbolId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How control leaves a basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockExit {
    /// Unconditional edge
    Goto(BlockId),
    /// Conditional edge on a boolean operation
    Branch {
        condition: OperationId,
        when_true: BlockId,
        when_false: BlockId,
    },
    /// Routine exit
    Return(Option<OperationId>),
    /// Abrupt exit, routed to the block's exception handler when there is one
    Throw(Option<OperationId>),
}

impl BlockExit {
    /// Operation evaluated as part of the exit (condition / returned / thrown value)
    pub fn value(&self) -> Option<OperationId> {
        match self {
            Self::Goto(_) => None,
            Self::Branch { condition, .. } => Some(*condition),
            Self::Return(value) | Self::Throw(value) => *value,
        }
    }

    fn targets(&self) -> Vec<BlockId> {
        match self {
            Self::Goto(target) => vec![*target],
            Self::Branch {
                when_true,
                when_false,
                ..
            } => vec![*when_true, *when_false],
            Self::Return(_) | Self::Throw(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Root operations (statements) in source order
    pub operations: Vec<OperationId>,
    pub exit: BlockExit,
    /// Abrupt edge target for throwing operations inside this block
    pub exception_handler: Option<BlockId>,
}

impl BasicBlock {
    pub fn new(id: BlockId, exit: BlockExit) -> Self {
        Self {
            id,
            operations: Vec::new(),
            exit,
            exception_handler: None,
        }
    }
}

/// Malformed routine input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("routine {0} has no basic blocks")]
    EmptyRoutine(RoutineId),

    #[error("block at position {position} is labelled {found}")]
    BlockIndexMismatch { position: usize, found: BlockId },

    #[error("operation at position {position} is labelled {found}")]
    OperationIndexMismatch { position: usize, found: OperationId },

    #[error("reference to unknown operation {0}")]
    UnknownOperation(OperationId),

    #[error("reference to unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("operation tree contains a cycle through {0}")]
    CyclicOperationTree(OperationId),
}

/// Validated routine body
#[derive(Debug, Clone)]
pub struct RoutineBody {
    id: RoutineId,
    name: String,
    blocks: Vec<BasicBlock>,
    operations: Vec<Operation>,
    /// Inner (lambda-local) symbol → enclosing symbol sharing its storage
    closure_captures: FxHashMap<SymbolId, SymbolId>,
    /// Per block: operations in evaluation order, exit value last
    execution_order: Vec<Vec<OperationId>>,
    /// Pure write locations (assignment targets, `out` arguments)
    write_targets: FxHashSet<OperationId>,
}

impl RoutineBody {
    pub fn new(
        id: RoutineId,
        name: impl Into<String>,
        blocks: Vec<BasicBlock>,
        operations: Vec<Operation>,
        closure_captures: impl IntoIterator<Item = (SymbolId, SymbolId)>,
    ) -> Result<Self, GraphError> {
        if blocks.is_empty() {
            return Err(GraphError::EmptyRoutine(id));
        }

        for (position, block) in blocks.iter().enumerate() {
            if block.id.0 as usize != position {
                return Err(GraphError::BlockIndexMismatch {
                    position,
                    found: block.id,
                });
            }
        }

        for (position, operation) in operations.iter().enumerate() {
            if operation.id.routine != id || operation.id.index as usize != position {
                return Err(GraphError::OperationIndexMismatch {
                    position,
                    found: operation.id,
                });
            }
        }

        let mut body = Self {
            id,
            name: name.into(),
            blocks,
            operations,
            closure_captures: closure_captures.into_iter().collect(),
            execution_order: Vec::new(),
            write_targets: FxHashSet::default(),
        };

        body.validate_references()?;
        body.execution_order = body
            .blocks
            .iter()
            .map(|block| body.block_execution_order(block))
            .collect::<Result<_, _>>()?;
        body.write_targets = body.collect_write_targets();

        Ok(body)
    }

    pub fn id(&self) -> RoutineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> BlockId {
        self.blocks[0].id
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.0 as usize)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        if id.routine != self.id {
            return None;
        }
        self.operations.get(id.index as usize)
    }

    pub fn contains(&self, id: OperationId) -> bool {
        self.operation(id).is_some()
    }

    /// Operations of `block` in evaluation order; empty for unknown blocks
    pub fn execution_order(&self, block: BlockId) -> &[OperationId] {
        self.execution_order
            .get(block.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `true` when `operation` is only written, never read (e.g. `x` in `x = 1`)
    pub fn is_write_target(&self, operation: OperationId) -> bool {
        self.write_targets.contains(&operation)
    }

    /// Enclosing symbol for a closure-captured symbol (one hop)
    pub fn closure_capture(&self, inner: SymbolId) -> Option<SymbolId> {
        self.closure_captures.get(&inner).copied()
    }

    fn validate_references(&self) -> Result<(), GraphError> {
        let known_op = |id: OperationId| {
            if self.contains(id) {
                Ok(())
            } else {
                Err(GraphError::UnknownOperation(id))
            }
        };
        let known_block = |id: BlockId| {
            if self.block(id).is_some() {
                Ok(())
            } else {
                Err(GraphError::UnknownBlock(id))
            }
        };

        for operation in &self.operations {
            for child in operation.kind.children() {
                known_op(child)?;
            }
        }

        for block in &self.blocks {
            for root in &block.operations {
                known_op(*root)?;
            }
            if let Some(value) = block.exit.value() {
                known_op(value)?;
            }
            for target in block.exit.targets() {
                known_block(target)?;
            }
            if let Some(handler) = block.exception_handler {
                known_block(handler)?;
            }
        }

        Ok(())
    }

    fn block_execution_order(&self, block: &BasicBlock) -> Result<Vec<OperationId>, GraphError> {
        let mut order = Vec::new();
        let mut on_stack = FxHashSet::default();
        for root in block.operations.iter().copied().chain(block.exit.value()) {
            self.post_order(root, &mut on_stack, &mut order)?;
        }
        Ok(order)
    }

    fn post_order(
        &self,
        id: OperationId,
        on_stack: &mut FxHashSet<OperationId>,
        order: &mut Vec<OperationId>,
    ) -> Result<(), GraphError> {
        if !on_stack.insert(id) {
            return Err(GraphError::CyclicOperationTree(id));
        }
        let operation = self
            .operation(id)
            .ok_or(GraphError::UnknownOperation(id))?;
        for child in operation.kind.children() {
            self.post_order(child, on_stack, order)?;
        }
        on_stack.remove(&id);
        order.push(id);
        Ok(())
    }

    fn collect_write_targets(&self) -> FxHashSet<OperationId> {
        let mut targets = FxHashSet::default();
        for operation in &self.operations {
            match &operation.kind {
                OperationKind::SimpleAssignment { target, .. } => {
                    targets.insert(*target);
                }
                OperationKind::Invocation { arguments, .. }
                | OperationKind::ObjectCreation { arguments, .. } => {
                    targets.extend(
                        arguments
                            .iter()
                            .filter(|a| a.kind == ArgumentKind::Out)
                            .map(|a| a.value),
                    );
                }
                _ => {}
            }
        }
        targets
    }
}
