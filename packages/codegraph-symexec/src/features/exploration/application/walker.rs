//! Work-list exploration of one routine
//!
//! Breadth-first over (program point, state) pairs:
//! 1. pop a pending pair
//! 2. run the processor chain of the operation at that point (or the block exit)
//! 3. for each successor: drop it if an equal state was already visited at the successor
//!    point, otherwise run the checks and enqueue it
//!
//! The visited set and the step counter are both capped; hitting a cap ends the routine
//! as `Incomplete` instead of reporting anything about unexplored paths.

use crate::config::ExplorationConfig;
use crate::features::checks::domain::FindingCollector;
use crate::features::checks::ports::{CheckContext, SymbolicCheck};
use crate::features::exploration::domain::{
    CancellationToken, ExplorationOutcome, ExplorationStats, IncompleteReason, RoutineReport,
};
use crate::features::flow_graph::domain::{BlockExit, Operation, RoutineBody};
use crate::features::flow_graph::ports::SemanticModel;
use crate::features::processors::application::ProcessorRegistry;
use crate::features::processors::domain::{ProcessorError, SymbolicContext, ValueFactory};
use crate::features::processors::infrastructure::split;
use crate::features::program_state::domain::ProgramState;
use crate::shared::models::{BlockId, ProgramPoint};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;

/// Why the loop stopped before the work list ran dry
enum Halt {
    Incomplete(IncompleteReason),
    Cancelled,
    Failed(String),
}

impl From<ProcessorError> for Halt {
    fn from(error: ProcessorError) -> Self {
        Halt::Failed(error.to_string())
    }
}

pub struct Walker<'a> {
    routine: &'a RoutineBody,
    semantic: &'a dyn SemanticModel,
    registry: &'a ProcessorRegistry,
    checks: &'a [Arc<dyn SymbolicCheck>],
    config: &'a ExplorationConfig,
    cancel: &'a CancellationToken,
    values: ValueFactory,
    visited: FxHashSet<(ProgramPoint, ProgramState)>,
    pending: VecDeque<(ProgramPoint, ProgramState)>,
    findings: FindingCollector,
    stats: ExplorationStats,
}

impl<'a> Walker<'a> {
    pub fn new(
        routine: &'a RoutineBody,
        semantic: &'a dyn SemanticModel,
        registry: &'a ProcessorRegistry,
        checks: &'a [Arc<dyn SymbolicCheck>],
        config: &'a ExplorationConfig,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            routine,
            semantic,
            registry,
            checks,
            config,
            cancel,
            values: ValueFactory::new(),
            visited: FxHashSet::default(),
            pending: VecDeque::new(),
            findings: FindingCollector::new(),
            stats: ExplorationStats::default(),
        }
    }

    /// Explore until the work list is empty or a budget/cancellation stops it
    pub fn run(mut self) -> RoutineReport {
        let outcome = match self.explore() {
            Ok(()) => ExplorationOutcome::Completed,
            Err(Halt::Incomplete(reason)) => ExplorationOutcome::Incomplete { reason },
            Err(Halt::Cancelled) => ExplorationOutcome::Cancelled,
            Err(Halt::Failed(error)) => ExplorationOutcome::Failed { error },
        };

        self.stats.visited_pairs = self.visited.len();
        self.stats.values_created = self.values.created();
        let findings = match outcome {
            ExplorationOutcome::Cancelled => Vec::new(),
            _ => self.findings.into_findings(),
        };

        RoutineReport {
            routine: self.routine.id(),
            name: self.routine.name().to_string(),
            outcome,
            findings,
            stats: self.stats,
        }
    }

    fn explore(&mut self) -> Result<(), Halt> {
        let routine = self.routine;
        let entry = ProgramPoint::entry(routine.entry());
        self.publish(entry, None, ProgramState::empty(routine.id()))?;

        while let Some((point, state)) = self.pending.pop_front() {
            if self.cancel.is_cancelled() {
                return Err(Halt::Cancelled);
            }
            if self.stats.steps >= self.config.max_steps {
                return Err(Halt::Incomplete(IncompleteReason::StepLimit {
                    limit: self.config.max_steps,
                }));
            }
            self.stats.steps += 1;
            tracing::trace!(point = %point, pending = self.pending.len(), "step");

            match routine.execution_order(point.block).get(point.index) {
                Some(&operation) => {
                    let operation = routine.operation(operation).ok_or_else(|| {
                        Halt::Failed(format!("operation {} missing from routine", operation))
                    })?;
                    self.process_operation(point, operation, state)?;
                }
                None => self.process_exit(point, state)?,
            }
        }
        Ok(())
    }

    fn process_operation(
        &mut self,
        point: ProgramPoint,
        operation: &'a Operation,
        state: ProgramState,
    ) -> Result<(), Halt> {
        let mut ctx = SymbolicContext {
            operation,
            state: &state,
            routine: self.routine,
            semantic: self.semantic,
            values: &mut self.values,
            config: self.config,
        };
        let successors = match self.registry.process(&mut ctx) {
            Ok(successors) => successors,
            Err(error @ ProcessorError::UnsupportedShape { .. }) => {
                tracing::debug!("Skipping operation: {}", error);
                self.stats.skipped_operations += 1;
                vec![state]
            }
            Err(error @ ProcessorError::State(_)) => return Err(error.into()),
        };
        if successors.is_empty() {
            self.stats.infeasible_paths += 1;
        }

        let handler = self
            .routine
            .block(point.block)
            .and_then(|block| block.exception_handler)
            .filter(|_| operation.kind.may_throw());

        for successor in successors {
            if let Some(handler) = handler {
                let thrown = self.transition(&successor);
                self.publish(ProgramPoint::entry(handler), None, thrown)?;
            }
            self.publish(point.next(), Some(operation), successor)?;
        }
        Ok(())
    }

    fn process_exit(&mut self, point: ProgramPoint, state: ProgramState) -> Result<(), Halt> {
        let routine = self.routine;
        let Some(block) = routine.block(point.block) else {
            return Err(Halt::Failed(format!("block {} missing from routine", point.block)));
        };
        match &block.exit {
            BlockExit::Goto(target) => self.jump(*target, &state),
            BlockExit::Branch {
                condition,
                when_true,
                when_false,
            } => {
                let decided = state
                    .operation_value(*condition)
                    .and_then(|value| state.bool_constraint(value))
                    .is_some();
                let successors =
                    split(&mut self.values, routine, self.config, &state, *condition)?;
                if !decided {
                    self.stats.infeasible_paths += 2 - successors.len();
                }
                for successor in successors {
                    let target = if successor.outcome {
                        *when_true
                    } else {
                        *when_false
                    };
                    self.jump(target, &successor.state)?;
                }
                Ok(())
            }
            BlockExit::Throw(_) => match block.exception_handler {
                Some(handler) => self.jump(handler, &state),
                None => {
                    self.terminate();
                    Ok(())
                }
            },
            BlockExit::Return(_) => {
                self.terminate();
                Ok(())
            }
        }
    }

    /// Path leaves the routine; its exit pair was already checked when published
    fn terminate(&mut self) {
        self.stats.terminal_states += 1;
    }

    fn jump(&mut self, target: BlockId, state: &ProgramState) -> Result<(), Halt> {
        let next = self.transition(state);
        self.publish(ProgramPoint::entry(target), None, next)
    }

    /// State as it enters another block
    fn transition(&self, state: &ProgramState) -> ProgramState {
        if self.config.reset_operations_at_block_boundary {
            state.reset_operations()
        } else {
            state.clone()
        }
    }

    /// Record a successor pair unless an equal one was already visited
    fn publish(
        &mut self,
        point: ProgramPoint,
        operation: Option<&Operation>,
        state: ProgramState,
    ) -> Result<(), Halt> {
        let key = (point, state);
        if self.visited.contains(&key) {
            self.stats.duplicates_dropped += 1;
            return Ok(());
        }
        if self.visited.len() >= self.config.max_visited_pairs {
            return Err(Halt::Incomplete(IncompleteReason::VisitedLimit {
                limit: self.config.max_visited_pairs,
            }));
        }
        let (point, state) = key;
        self.visited.insert((point, state.clone()));
        self.run_checks(point, operation, &state);
        self.pending.push_back((point, state));
        Ok(())
    }

    fn run_checks(
        &mut self,
        point: ProgramPoint,
        operation: Option<&Operation>,
        state: &ProgramState,
    ) {
        let ctx = CheckContext {
            routine: self.routine,
            point,
            operation,
            state,
            semantic: self.semantic,
        };
        for check in self.checks {
            check.post_process(&ctx, &mut self.findings);
        }
    }
}
