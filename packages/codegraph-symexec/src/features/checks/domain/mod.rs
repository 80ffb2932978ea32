mod finding;

pub use finding::{Finding, FindingCollector, FindingSeverity, FindingSink};
