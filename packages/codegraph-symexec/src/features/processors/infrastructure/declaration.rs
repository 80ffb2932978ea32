//! Variable declarators

use crate::features::flow_graph::domain::OperationKind;
use crate::features::processors::domain::{ProcessorResult, SymbolicContext};

/// `T x = init;` binds the initializer's value to `x`; `T x;` leaves `x` unbound
pub fn process_declarator(ctx: &mut SymbolicContext<'_>) -> ProcessorResult {
    let operation = ctx.operation;
    let OperationKind::VariableDeclarator {
        symbol,
        initializer,
    } = &operation.kind
    else {
        return Err(ctx.unsupported("expected a variable declarator"));
    };
    match initializer {
        Some(initializer) => {
            let (state, value) = ctx.operand(ctx.state.clone(), *initializer)?;
            let state = ctx.bind(&state, value)?.with_symbol_value(*symbol, value);
            Ok(vec![state])
        }
        // a declaration re-entered in a loop must not keep the previous iteration's value
        None => Ok(vec![ctx.state.without_symbol_value(*symbol)]),
    }
}
