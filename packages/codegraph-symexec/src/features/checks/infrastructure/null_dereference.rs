//! Dereference of a value known to be null on the current path
//!
//! Receivers of calls, field accesses and array accesses are inspected in the state right
//! after the access was processed; the processors leave a `Null` receiver untouched so it
//! is still visible here.

use crate::features::checks::domain::{FindingSeverity, FindingSink};
use crate::features::checks::ports::{CheckContext, SymbolicCheck};
use crate::features::flow_graph::domain::{LiteralValue, OperationKind};
use crate::features::program_state::domain::ObjectConstraint;
use crate::shared::models::OperationId;

#[derive(Debug, Default, Clone, Copy)]
pub struct NullDereferenceCheck;

impl NullDereferenceCheck {
    pub const NAME: &'static str = "null-dereference";

    pub fn new() -> Self {
        Self
    }
}

impl SymbolicCheck for NullDereferenceCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn post_process(&self, ctx: &CheckContext<'_>, sink: &mut dyn FindingSink) {
        let Some(operation) = ctx.operation else {
            return;
        };
        let receiver = match &operation.kind {
            OperationKind::Invocation {
                instance: Some(instance),
                ..
            }
            | OperationKind::FieldReference {
                instance: Some(instance),
                ..
            } => *instance,
            OperationKind::ArrayElementReference { array, .. } => *array,
            _ => return,
        };
        let Some(value) = ctx.state.operation_value(receiver) else {
            return;
        };
        if ctx.state.nullness(value) != Some(ObjectConstraint::Null) {
            return;
        }
        let name = describe(ctx, receiver);
        sink.report(ctx.finding(
            Self::NAME,
            FindingSeverity::Error,
            format!("'{name}' is null on at least one execution path."),
        ));
    }
}

/// Display name of a receiver expression
fn describe(ctx: &CheckContext<'_>, operation: OperationId) -> String {
    let mut current = operation;
    for _ in 0..ctx.routine.operations().len() {
        let Some(op) = ctx.routine.operation(current) else {
            break;
        };
        match &op.kind {
            OperationKind::Parenthesized(inner) | OperationKind::Conversion(inner) => {
                current = *inner;
            }
            OperationKind::FlowCaptureReference(capture) => match ctx.state.capture(*capture) {
                Some(captured) => current = captured,
                None => break,
            },
            OperationKind::FlowCapture { value, .. } => current = *value,
            OperationKind::LocalReference(symbol) | OperationKind::ParameterReference(symbol) => {
                return ctx.semantic.symbol_name(*symbol);
            }
            OperationKind::FieldReference { field, .. } => return ctx.semantic.symbol_name(*field),
            OperationKind::Literal(LiteralValue::Null) => return "null".to_string(),
            OperationKind::Invocation { method, .. } => return format!("{method}()"),
            _ => break,
        }
    }
    "expression".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::checks::domain::FindingCollector;
    use crate::features::flow_graph::domain::RoutineBody;
    use crate::features::flow_graph::infrastructure::{RoutineBuilder, SymbolTable};
    use crate::features::program_state::domain::{Constraint, ProgramState, SymbolicValue};
    use crate::shared::models::{ProgramPoint, RoutineId};

    struct Fixture {
        body: RoutineBody,
        symbols: SymbolTable,
        receiver: OperationId,
        access: OperationId,
    }

    fn fixture(access: impl FnOnce(&mut RoutineBuilder, OperationId) -> OperationId) -> Fixture {
        let mut symbols = SymbolTable::new();
        let o = symbols.nullable_local("o");
        let mut b = RoutineBuilder::new(RoutineId(0), "f");
        let entry = b.block();
        let receiver = b.local(o);
        let access = access(&mut b, receiver);
        b.push(entry, access);
        Fixture {
            body: b.build().unwrap(),
            symbols,
            receiver,
            access,
        }
    }

    fn check(fixture: &Fixture, constraint: Constraint) -> FindingCollector {
        let value = SymbolicValue(0);
        let state = ProgramState::empty(fixture.body.id())
            .with_operation_value(fixture.receiver, value)
            .unwrap()
            .with_constraint(value, constraint)
            .unwrap();
        let ctx = CheckContext {
            routine: &fixture.body,
            point: ProgramPoint::new(fixture.body.entry(), 1),
            operation: fixture.body.operation(fixture.access),
            state: &state,
            semantic: &fixture.symbols,
        };
        let mut sink = FindingCollector::new();
        NullDereferenceCheck.post_process(&ctx, &mut sink);
        sink
    }

    #[test]
    fn test_reports_null_receiver_of_call() {
        let f = fixture(|b, receiver| b.invoke(Some(receiver), "ToString", Vec::new()));
        let sink = check(&f, Constraint::NULL);
        assert_eq!(sink.len(), 1);
        assert_eq!(
            sink.findings()[0].message,
            "'o' is null on at least one execution path."
        );
        assert_eq!(sink.findings()[0].operation, Some(f.access));
    }

    #[test]
    fn test_reports_field_and_array_access() {
        let field = crate::shared::models::SymbolId(1);
        let f = fixture(|b, receiver| b.field(Some(receiver), field));
        assert_eq!(check(&f, Constraint::NULL).len(), 1);

        let a = fixture(|b, receiver| {
            let zero = b.int(0);
            b.element(receiver, zero)
        });
        assert_eq!(check(&a, Constraint::NULL).len(), 1);
    }

    #[test]
    fn test_silent_when_not_null() {
        let f = fixture(|b, receiver| b.invoke(Some(receiver), "ToString", Vec::new()));
        assert!(check(&f, Constraint::NOT_NULL).is_empty());
    }
}
