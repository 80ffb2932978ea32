//! Common test utilities for codegraph-symexec
//!
//! Small routine fixtures shared by the integration tests. Each fixture mirrors a short
//! source snippet, written above it as a comment.

#![allow(dead_code)]

use codegraph_symexec::{
    BinaryOperator, BlockExit, CancellationToken, ExplorationConfig, RoutineBody, RoutineBuilder,
    RoutineId, RoutineReport, SymbolTable, SymbolicEngine,
};

/// A routine together with the symbols it refers to
pub struct Program {
    pub body: RoutineBody,
    pub symbols: SymbolTable,
}

impl Program {
    pub fn explore(&self, engine: &SymbolicEngine) -> RoutineReport {
        engine.analyze(&self.body, &self.symbols, &CancellationToken::new())
    }
}

pub fn engine() -> SymbolicEngine {
    engine_with(ExplorationConfig::default())
}

pub fn engine_with(config: ExplorationConfig) -> SymbolicEngine {
    SymbolicEngine::new(config)
        .expect("valid config")
        .with_builtin_checks()
}

/// Report with the wall-clock timing cleared, for equality assertions
pub fn timeless(mut report: RoutineReport) -> RoutineReport {
    report.stats.analysis_time_ms = 0;
    report
}

/// ```text
/// int x = 0;
/// x = x + 1;
/// ```
pub fn increment_program(routine: RoutineId) -> Program {
    let mut symbols = SymbolTable::new();
    let x = symbols.local("x");
    let mut b = RoutineBuilder::new(routine, "Increment");
    let entry = b.block();
    let zero = b.int(0);
    let decl = b.declare(x, Some(zero));
    let read = b.local(x);
    let one = b.int(1);
    let sum = b.binary(BinaryOperator::Add, read, one);
    let target = b.local(x);
    let assign = b.assign(target, sum);
    b.push(entry, decl);
    b.push(entry, assign);
    Program {
        body: b.build().expect("valid routine"),
        symbols,
    }
}

/// ```text
/// int x;
/// if (flag) { x = 1; } else { x = 2; }
/// return x;
/// ```
pub fn if_else_program(routine: RoutineId) -> Program {
    let mut symbols = SymbolTable::new();
    let flag = symbols.parameter("flag", false);
    let x = symbols.local("x");
    let mut b = RoutineBuilder::new(routine, "IfElse");
    let entry = b.block();
    let then_block = b.block();
    let else_block = b.block();
    let join = b.block();

    let decl = b.declare(x, None);
    b.push(entry, decl);
    let condition = b.parameter(flag);
    b.branch(entry, condition, then_block, else_block);

    for (block, value) in [(then_block, 1), (else_block, 2)] {
        let target = b.local(x);
        let literal = b.int(value);
        let assign = b.assign(target, literal);
        b.push(block, assign);
        b.goto(block, join);
    }

    let result = b.local(x);
    b.exit(join, BlockExit::Return(Some(result)));
    Program {
        body: b.build().expect("valid routine"),
        symbols,
    }
}

/// ```text
/// for (int i = 0; i < bound; i++) { }
/// ```
pub fn counted_loop_program(routine: RoutineId, bound: i64) -> Program {
    let mut symbols = SymbolTable::new();
    let i = symbols.local("i");
    let mut b = RoutineBuilder::new(routine, "CountedLoop");
    let entry = b.block();
    let head = b.block();
    let body = b.block();
    let exit = b.block();

    let zero = b.int(0);
    let decl = b.declare(i, Some(zero));
    b.push(entry, decl);
    b.goto(entry, head);

    let read = b.local(i);
    let limit = b.int(bound);
    let condition = b.binary(BinaryOperator::LessThan, read, limit);
    b.branch(head, condition, body, exit);

    let target = b.local(i);
    let step = b.increment(target, true);
    b.push(body, step);
    b.goto(body, head);

    Program {
        body: b.build().expect("valid routine"),
        symbols,
    }
}

/// ```text
/// int x = 0;
/// while (flag) { x = x + 1; }
/// ```
pub fn unbounded_loop_program(routine: RoutineId) -> Program {
    let mut symbols = SymbolTable::new();
    let flag = symbols.parameter("flag", false);
    let x = symbols.local("x");
    let mut b = RoutineBuilder::new(routine, "UnboundedLoop");
    let entry = b.block();
    let head = b.block();
    let body = b.block();
    let exit = b.block();

    let zero = b.int(0);
    let decl = b.declare(x, Some(zero));
    b.push(entry, decl);
    b.goto(entry, head);

    let condition = b.parameter(flag);
    b.branch(head, condition, body, exit);

    let read = b.local(x);
    let one = b.int(1);
    let sum = b.binary(BinaryOperator::Add, read, one);
    let target = b.local(x);
    let assign = b.assign(target, sum);
    b.push(body, assign);
    b.goto(body, head);

    Program {
        body: b.build().expect("valid routine"),
        symbols,
    }
}

/// ```text
/// string s = null;
/// s.ToString();
/// ```
pub fn null_receiver_program(routine: RoutineId) -> Program {
    let mut symbols = SymbolTable::new();
    let s = symbols.nullable_local("s");
    let mut b = RoutineBuilder::new(routine, "NullReceiver");
    let entry = b.block();
    let null = b.null();
    let decl = b.declare(s, Some(null));
    let receiver = b.local(s);
    let call = b.invoke(Some(receiver), "ToString", Vec::new());
    b.at_line(call, 2);
    b.push(entry, decl);
    b.push(entry, call);
    Program {
        body: b.build().expect("valid routine"),
        symbols,
    }
}
