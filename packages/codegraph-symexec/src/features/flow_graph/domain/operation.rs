//! Operation tree nodes
//!
//! One `Operation` per semantic action in a routine body (read, write, call, test).
//! Children are referenced by id; the arena lives in `RoutineBody`.

use crate::shared::models::{CaptureId, OperationId, SymbolId};
use serde::{Deserialize, Serialize};

/// Compile-time constant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LiteralValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::NotEquals
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
        )
    }

    /// Operator with swapped operands: `a < b` ⇔ `b > a`
    pub fn mirrored(&self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::LessThanOrEqual => Self::GreaterThanOrEqual,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanOrEqual => Self::LessThanOrEqual,
            other => *other,
        }
    }

    /// Logical negation of a comparison: `!(a < b)` ⇔ `a >= b`
    pub fn negated(&self) -> Option<Self> {
        match self {
            Self::Equals => Some(Self::NotEquals),
            Self::NotEquals => Some(Self::Equals),
            Self::LessThan => Some(Self::GreaterThanOrEqual),
            Self::LessThanOrEqual => Some(Self::GreaterThan),
            Self::GreaterThan => Some(Self::LessThanOrEqual),
            Self::GreaterThanOrEqual => Some(Self::LessThan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
}

/// How an argument is passed to an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgumentKind {
    Value,
    /// Passed by reference, the callee may overwrite the location
    Ref,
    /// Output-only location, written by the callee
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub value: OperationId,
    pub kind: ArgumentKind,
}

impl Argument {
    pub fn by_value(value: OperationId) -> Self {
        Self {
            value,
            kind: ArgumentKind::Value,
        }
    }

    pub fn by_ref(value: OperationId) -> Self {
        Self {
            value,
            kind: ArgumentKind::Ref,
        }
    }

    pub fn out(value: OperationId) -> Self {
        Self {
            value,
            kind: ArgumentKind::Out,
        }
    }

    /// Callee may write through this argument
    pub fn is_writable(&self) -> bool {
        !matches!(self.kind, ArgumentKind::Value)
    }
}

/// Pattern of an `is` test
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pattern {
    Null,
    NotNull,
    Constant(LiteralValue),
    Type(String),
    Discard,
}

/// Operation kinds understood by the engine
///
/// Anything the host cannot map is passed as `Other`; the engine propagates state
/// through it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Literal(LiteralValue),
    LocalReference(SymbolId),
    ParameterReference(SymbolId),
    FieldReference {
        /// `None` for static fields
        instance: Option<OperationId>,
        field: SymbolId,
    },
    /// `this` / `self`
    InstanceReference,
    ArrayElementReference {
        array: OperationId,
        index: OperationId,
    },
    Parenthesized(OperationId),
    Conversion(OperationId),
    FlowCapture {
        id: CaptureId,
        value: OperationId,
    },
    FlowCaptureReference(CaptureId),
    SimpleAssignment {
        target: OperationId,
        value: OperationId,
    },
    CompoundAssignment {
        target: OperationId,
        value: OperationId,
        operator: BinaryOperator,
    },
    Increment {
        target: OperationId,
        decrement: bool,
        postfix: bool,
    },
    VariableDeclarator {
        symbol: SymbolId,
        initializer: Option<OperationId>,
    },
    Binary {
        operator: BinaryOperator,
        left: OperationId,
        right: OperationId,
    },
    Unary {
        operator: UnaryOperator,
        operand: OperationId,
    },
    Invocation {
        instance: Option<OperationId>,
        method: String,
        arguments: Vec<Argument>,
    },
    ObjectCreation {
        type_name: String,
        arguments: Vec<Argument>,
    },
    IsType {
        value: OperationId,
        type_name: String,
    },
    IsPattern {
        value: OperationId,
        pattern: Pattern,
    },
    Other(String),
}

/// Fieldless discriminant of `OperationKind`, used as the processor registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationTag {
    Literal,
    LocalReference,
    ParameterReference,
    FieldReference,
    InstanceReference,
    ArrayElementReference,
    Parenthesized,
    Conversion,
    FlowCapture,
    FlowCaptureReference,
    SimpleAssignment,
    CompoundAssignment,
    Increment,
    VariableDeclarator,
    Binary,
    Unary,
    Invocation,
    ObjectCreation,
    IsType,
    IsPattern,
    Other,
}

impl OperationKind {
    pub fn tag(&self) -> OperationTag {
        match self {
            Self::Literal(_) => OperationTag::Literal,
            Self::LocalReference(_) => OperationTag::LocalReference,
            Self::ParameterReference(_) => OperationTag::ParameterReference,
            Self::FieldReference { .. } => OperationTag::FieldReference,
            Self::InstanceReference => OperationTag::InstanceReference,
            Self::ArrayElementReference { .. } => OperationTag::ArrayElementReference,
            Self::Parenthesized(_) => OperationTag::Parenthesized,
            Self::Conversion(_) => OperationTag::Conversion,
            Self::FlowCapture { .. } => OperationTag::FlowCapture,
            Self::FlowCaptureReference(_) => OperationTag::FlowCaptureReference,
            Self::SimpleAssignment { .. } => OperationTag::SimpleAssignment,
            Self::CompoundAssignment { .. } => OperationTag::CompoundAssignment,
            Self::Increment { .. } => OperationTag::Increment,
            Self::VariableDeclarator { .. } => OperationTag::VariableDeclarator,
            Self::Binary { .. } => OperationTag::Binary,
            Self::Unary { .. } => OperationTag::Unary,
            Self::Invocation { .. } => OperationTag::Invocation,
            Self::ObjectCreation { .. } => OperationTag::ObjectCreation,
            Self::IsType { .. } => OperationTag::IsType,
            Self::IsPattern { .. } => OperationTag::IsPattern,
            Self::Other(_) => OperationTag::Other,
        }
    }

    /// Child operations in evaluation order
    pub fn children(&self) -> Vec<OperationId> {
        match self {
            Self::Literal(_)
            | Self::LocalReference(_)
            | Self::ParameterReference(_)
            | Self::InstanceReference
            | Self::FlowCaptureReference(_)
            | Self::Other(_) => Vec::new(),
            Self::FieldReference { instance, .. } => instance.iter().copied().collect(),
            Self::ArrayElementReference { array, index } => vec![*array, *index],
            Self::Parenthesized(inner) | Self::Conversion(inner) => vec![*inner],
            Self::FlowCapture { value, .. } => vec![*value],
            Self::SimpleAssignment { target, value }
            | Self::CompoundAssignment { target, value, .. } => vec![*target, *value],
            Self::Increment { target, .. } => vec![*target],
            Self::VariableDeclarator { initializer, .. } => initializer.iter().copied().collect(),
            Self::Binary { left, right, .. } => vec![*left, *right],
            Self::Unary { operand, .. } => vec![*operand],
            Self::Invocation {
                instance,
                arguments,
                ..
            } => instance
                .iter()
                .copied()
                .chain(arguments.iter().map(|a| a.value))
                .collect(),
            Self::ObjectCreation { arguments, .. } => arguments.iter().map(|a| a.value).collect(),
            Self::IsType { value, .. } | Self::IsPattern { value, .. } => vec![*value],
        }
    }

    /// May raise an exception (forwarded to the block's handler)
    pub fn may_throw(&self) -> bool {
        matches!(self, Self::Invocation { .. } | Self::ObjectCreation { .. })
    }
}

/// A node of the operation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub kind: OperationKind,
    /// Source line, when the host knows it
    pub line: Option<u32>,
}

impl Operation {
    pub fn new(id: OperationId, kind: OperationKind) -> Self {
        Self {
            id,
            kind,
            line: None,
        }
    }

    pub fn tag(&self) -> OperationTag {
        self.kind.tag()
    }
}
