//! Straight-line evaluation harness for processor tests

use crate::config::ExplorationConfig;
use crate::features::flow_graph::domain::RoutineBody;
use crate::features::flow_graph::infrastructure::{RoutineBuilder, SymbolTable};
use crate::features::processors::application::ProcessorRegistry;
use crate::features::processors::domain::{ProcessorResult, SymbolicContext, ValueFactory};
use crate::features::program_state::domain::{ProgramState, SymbolicValue};
use crate::shared::models::{OperationId, RoutineId};

pub(crate) const ROUTINE: RoutineId = RoutineId(0);

pub(crate) struct Harness {
    pub b: RoutineBuilder,
    pub symbols: SymbolTable,
    pub config: ExplorationConfig,
    pub values: ValueFactory,
    registry: ProcessorRegistry,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_registry(ProcessorRegistry::builtin())
    }

    pub fn with_registry(registry: ProcessorRegistry) -> Self {
        Self {
            b: RoutineBuilder::new(ROUTINE, "test"),
            symbols: SymbolTable::new(),
            config: ExplorationConfig::default(),
            values: ValueFactory::new(),
            registry,
        }
    }

    /// Single-block routine with `roots` as its statements
    pub fn build(&mut self, roots: &[OperationId]) -> RoutineBody {
        let entry = self.b.block();
        for root in roots {
            self.b.push(entry, *root);
        }
        let builder = std::mem::replace(&mut self.b, RoutineBuilder::new(ROUTINE, "test"));
        builder.build().expect("valid routine")
    }

    pub fn eval(
        &mut self,
        body: &RoutineBody,
        state: ProgramState,
        operation: OperationId,
    ) -> ProcessorResult {
        let op = body.operation(operation).expect("operation in routine");
        let mut ctx = SymbolicContext {
            operation: op,
            state: &state,
            routine: body,
            semantic: &self.symbols,
            values: &mut self.values,
            config: &self.config,
        };
        self.registry.process(&mut ctx)
    }

    /// Evaluate the entry block of `body` from `state`, returning every feasible end state
    pub fn run_body_from(&mut self, body: &RoutineBody, state: ProgramState) -> Vec<ProgramState> {
        let mut states = vec![state];
        for operation in body.execution_order(body.entry()).to_vec() {
            let mut next = Vec::new();
            for state in states {
                next.extend(self.eval(body, state, operation).expect("processor succeeds"));
            }
            states = next;
        }
        states
    }

    pub fn run_all(&mut self, roots: &[OperationId]) -> Vec<ProgramState> {
        let body = self.build(roots);
        self.run_body_from(&body, ProgramState::empty(ROUTINE))
    }

    /// Evaluate `roots` expecting exactly one feasible end state
    pub fn run(&mut self, roots: &[OperationId]) -> ProgramState {
        let mut states = self.run_all(roots);
        assert_eq!(states.len(), 1, "expected a single end state");
        states.remove(0)
    }
}

pub(crate) fn exact(state: &ProgramState, value: SymbolicValue) -> Option<i64> {
    state.range(value).and_then(|r| r.exact_value())
}
