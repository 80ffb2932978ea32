mod cancellation;
mod outcome;

pub use cancellation::CancellationToken;
pub use outcome::{ExplorationOutcome, ExplorationStats, IncompleteReason, RoutineReport};
