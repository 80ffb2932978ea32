//! Per-routine exploration results

use crate::features::checks::domain::Finding;
use crate::shared::models::RoutineId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget that stopped an exploration early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncompleteReason {
    VisitedLimit { limit: usize },
    StepLimit { limit: usize },
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VisitedLimit { limit } => write!(f, "visited pair limit {} reached", limit),
            Self::StepLimit { limit } => write!(f, "step limit {} reached", limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExplorationOutcome {
    /// Every reachable (point, state) pair was visited
    Completed,
    /// A budget ran out; findings so far are kept, absence of findings proves nothing
    Incomplete { reason: IncompleteReason },
    /// Cancelled through the token; findings are discarded
    Cancelled,
    /// Program state invariant violated; the routine is abandoned
    Failed { error: String },
}

impl ExplorationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Exploration counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationStats {
    /// Work-list items processed
    pub steps: usize,
    /// Distinct (point, state) pairs
    pub visited_pairs: usize,
    /// Successors dropped because an equal state was already visited at that point
    pub duplicates_dropped: usize,
    /// Successors dropped because their constraints contradict
    pub infeasible_paths: usize,
    /// Operations skipped for lack of semantics
    pub skipped_operations: usize,
    /// Paths that reached a return or an unhandled throw
    pub terminal_states: usize,
    /// Symbolic values created
    pub values_created: usize,
    pub analysis_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineReport {
    pub routine: RoutineId,
    pub name: String,
    pub outcome: ExplorationOutcome,
    pub findings: Vec<Finding>,
    pub stats: ExplorationStats,
}

impl RoutineReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
