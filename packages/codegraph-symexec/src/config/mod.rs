//! Exploration configuration
//!
//! Same 3-tier layout as the rest of the codegraph family:
//! - Level 1: Preset (`fast`, `balanced`, `thorough`)
//! - Level 2: Builder overrides on `ExplorationConfig`
//! - Level 3: YAML schema v1
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_symexec::config::{ExplorationConfig, Preset};
//!
//! let config = ExplorationConfig::from_preset(Preset::Fast).max_steps(50_000);
//! let config = ExplorationConfig::from_yaml("team-symexec.yaml")?;
//! ```

pub mod error;
pub mod exploration_config;
pub mod preset;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use exploration_config::ExplorationConfig;
pub use preset::Preset;
pub use validation::Validatable;
