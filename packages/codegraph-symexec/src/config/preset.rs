//! Preset configurations
//!
//! Presets provide complete default exploration budgets for common use cases.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: small budgets, routines with heavy branching end up incomplete
    ///
    /// - max_visited_pairs=2_000, max_steps=20_000
    Fast,

    /// Development: default budgets
    ///
    /// - max_visited_pairs=10_000, max_steps=100_000
    Balanced,

    /// Security audit: large budgets
    ///
    /// - max_visited_pairs=100_000, max_steps=1_000_000
    Thorough,

    /// Custom: balanced defaults, expected to be overridden via YAML or builder API
    Custom,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        }
    }

    /// (max_visited_pairs, max_steps)
    pub(crate) fn budgets(&self) -> (usize, usize) {
        match self {
            Self::Fast => (2_000, 20_000),
            Self::Balanced | Self::Custom => (10_000, 100_000),
            Self::Thorough => (100_000, 1_000_000),
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!(Preset::from_str("fast").unwrap(), Preset::Fast);
        assert_eq!(Preset::from_str("THOROUGH").unwrap(), Preset::Thorough);
        assert!(matches!(
            Preset::from_str("ludicrous"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_preset_budgets_grow() {
        let (fast_pairs, fast_steps) = Preset::Fast.budgets();
        let (balanced_pairs, balanced_steps) = Preset::Balanced.budgets();
        let (thorough_pairs, thorough_steps) = Preset::Thorough.budgets();

        assert!(fast_pairs < balanced_pairs && balanced_pairs < thorough_pairs);
        assert!(fast_steps < balanced_steps && balanced_steps < thorough_steps);
    }
}
