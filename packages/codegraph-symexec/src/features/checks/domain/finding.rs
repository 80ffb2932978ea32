//! Findings reported by symbolic checks

use crate::shared::models::{OperationId, ProgramPoint, RoutineId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingSeverity {
    /// Information only
    Info,
    /// Suspicious code (warning)
    #[default]
    Warning,
    /// Definite defect on some path
    Error,
    Critical,
}

/// A defect observed on at least one feasible path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Reporting check (`SymbolicCheck::name`)
    pub check: String,
    pub severity: FindingSeverity,
    pub routine: RoutineId,
    /// Offending operation; `None` for findings on block exits
    pub operation: Option<OperationId>,
    /// Where the path was when the check fired
    pub point: ProgramPoint,
    pub line: Option<u32>,
    pub message: String,
}

/// Destination for findings emitted while a routine is explored
pub trait FindingSink {
    fn report(&mut self, finding: Finding);
}

/// Where a finding is anchored for deduplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Anchor {
    Operation(OperationId),
    /// Block exit findings have no operation
    Exit(ProgramPoint),
}

/// Collects findings, keeping the first report per (check, operation)
///
/// The same defect is usually observed on many paths; only its first sighting is kept.
#[derive(Debug, Default)]
pub struct FindingCollector {
    findings: Vec<Finding>,
    seen: FxHashSet<(String, Anchor)>,
}

impl FindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl FindingSink for FindingCollector {
    fn report(&mut self, finding: Finding) {
        let anchor = match finding.operation {
            Some(operation) => Anchor::Operation(operation),
            None => Anchor::Exit(finding.point),
        };
        if self.seen.insert((finding.check.clone(), anchor)) {
            tracing::debug!(
                check = %finding.check,
                point = %finding.point,
                message = %finding.message,
                "finding"
            );
            self.findings.push(finding);
        }
    }
}
