//! Error types for codegraph-symexec
//!
//! Setup failures (configuration, malformed routine bodies) surface here. Failures inside
//! one routine's exploration are reported in its `RoutineReport` instead.

use crate::config::ConfigError;
use crate::features::flow_graph::domain::GraphError;
use crate::features::program_state::domain::StateError;
use thiserror::Error;

/// Main error type for codegraph-symexec operations
#[derive(Debug, Error)]
pub enum SymexecError {
    /// Invalid exploration configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed routine body
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// State invariant violated outside a walker
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Result type alias for symexec operations
pub type Result<T> = std::result::Result<T, SymexecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::BlockId;

    #[test]
    fn test_graph_error_converts() {
        fn build() -> Result<()> {
            Err(GraphError::UnknownBlock(BlockId(7)))?;
            Ok(())
        }
        let err = build().unwrap_err();
        assert!(matches!(err, SymexecError::Graph(_)));
        assert!(err.to_string().starts_with("Graph error:"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: SymexecError = ConfigError::MissingVersion.into();
        assert!(matches!(err, SymexecError::Config(ConfigError::MissingVersion)));
    }
}
