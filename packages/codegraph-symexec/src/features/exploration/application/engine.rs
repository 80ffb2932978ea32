//! Symbolic execution engine
//!
//! Owns the validated configuration, the processor registry and the registered checks.
//! Every routine gets its own walker (work list, visited set, value factory), so routines
//! can be explored in parallel while the engine itself is shared read-only.

use super::walker::Walker;
use crate::config::{ExplorationConfig, Validatable};
use crate::errors::Result;
use crate::features::checks::infrastructure::{NullDereferenceCheck, UselessIncrementCheck};
use crate::features::checks::ports::SymbolicCheck;
use crate::features::exploration::domain::{CancellationToken, ExplorationOutcome, RoutineReport};
use crate::features::flow_graph::domain::{OperationTag, RoutineBody};
use crate::features::flow_graph::ports::SemanticModel;
use crate::features::processors::application::ProcessorRegistry;
use crate::features::processors::domain::Processor;
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct SymbolicEngine {
    config: ExplorationConfig,
    registry: ProcessorRegistry,
    checks: Vec<Arc<dyn SymbolicCheck>>,
}

impl SymbolicEngine {
    /// Engine with the built-in processors and no checks
    pub fn new(config: ExplorationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: ProcessorRegistry::builtin(),
            checks: Vec::new(),
        })
    }

    pub fn with_check(mut self, check: impl SymbolicCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Register `NullDereferenceCheck` and `UselessIncrementCheck`
    pub fn with_builtin_checks(self) -> Self {
        self.with_check(NullDereferenceCheck::new())
            .with_check(UselessIncrementCheck::new())
    }

    /// Chain an extra processor after the registered ones for `tag`
    pub fn with_processor(mut self, tag: OperationTag, processor: Processor) -> Self {
        self.registry.register(tag, processor);
        self
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Explore one routine
    pub fn analyze(
        &self,
        routine: &RoutineBody,
        semantic: &dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> RoutineReport {
        let start = Instant::now();
        tracing::debug!("Exploring routine {} ({})", routine.name(), routine.id());

        let walker = Walker::new(
            routine,
            semantic,
            &self.registry,
            &self.checks,
            &self.config,
            cancel,
        );
        let mut report = walker.run();
        report.stats.analysis_time_ms = start.elapsed().as_millis() as u64;

        match &report.outcome {
            ExplorationOutcome::Completed => tracing::info!(
                "Explored {}: {} steps, {} visited pairs, {} findings in {}ms",
                report.name,
                report.stats.steps,
                report.stats.visited_pairs,
                report.findings.len(),
                report.stats.analysis_time_ms
            ),
            ExplorationOutcome::Incomplete { reason } => tracing::warn!(
                "Exploration of {} incomplete: {} ({} findings kept)",
                report.name,
                reason,
                report.findings.len()
            ),
            ExplorationOutcome::Cancelled => {
                tracing::info!("Exploration of {} cancelled", report.name)
            }
            ExplorationOutcome::Failed { error } => {
                tracing::warn!("Exploration of {} failed: {}", report.name, error)
            }
        }
        report
    }

    /// Explore independent routines, in parallel when enabled
    pub fn analyze_all(
        &self,
        routines: &[RoutineBody],
        semantic: &dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> Vec<RoutineReport> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return routines
                    .par_iter()
                    .map(|routine| self.analyze(routine, semantic, cancel))
                    .collect();
            }
        }

        routines
            .iter()
            .map(|routine| self.analyze(routine, semantic, cancel))
            .collect()
    }
}

impl std::fmt::Debug for SymbolicEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolicEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("checks", &self.check_names())
            .finish()
    }
}
