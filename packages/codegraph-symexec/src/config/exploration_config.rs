//! Symbolic exploration configuration
//!
//! Budgets that bound the exploded graph of a single routine, plus the switches for the
//! optional state-hygiene and constraint-learning passes.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

const MAX_VISITED_PAIRS_LIMIT: usize = 10_000_000;
const MAX_STEPS_LIMIT: usize = 100_000_000;

/// Exploration configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Maximum distinct (program point, state) pairs per routine (1..=10_000_000)
    pub max_visited_pairs: usize,

    /// Maximum work-list steps per routine (1..=100_000_000)
    pub max_steps: usize,

    /// Clear operation values when a state enters another block
    /// Keeps loop-head states comparable so convergent loops deduplicate
    pub reset_operations_at_block_boundary: bool,

    /// Learn operand constraints (nullness, ranges) on branch successors
    pub learn_branch_constraints: bool,

    /// Analyze independent routines on the rayon pool
    pub parallel: bool,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl ExplorationConfig {
    /// Create configuration from preset
    pub fn from_preset(preset: Preset) -> Self {
        let (max_visited_pairs, max_steps) = preset.budgets();
        Self {
            max_visited_pairs,
            max_steps,
            reset_operations_at_block_boundary: true,
            learn_branch_constraints: true,
            parallel: !matches!(preset, Preset::Fast),
        }
    }

    /// Builder: Set max_visited_pairs
    pub fn max_visited_pairs(mut self, v: usize) -> Self {
        self.max_visited_pairs = v;
        self
    }

    /// Builder: Set max_steps
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Builder: Enable/disable operation reset at block boundaries
    pub fn reset_operations_at_block_boundary(mut self, v: bool) -> Self {
        self.reset_operations_at_block_boundary = v;
        self
    }

    /// Builder: Enable/disable branch constraint learning
    pub fn learn_branch_constraints(mut self, v: bool) -> Self {
        self.learn_branch_constraints = v;
        self
    }

    /// Builder: Enable/disable parallel routine analysis
    pub fn parallel(mut self, v: bool) -> Self {
        self.parallel = v;
        self
    }

    /// Load from a YAML file (schema v1)
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML schema v1
    ///
    /// ```yaml
    /// version: 1
    /// preset: thorough
    /// overrides:
    ///   max_steps: 500000
    /// ```
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = match file.preset.as_deref() {
            Some(name) => Preset::from_str(name)?,
            None => Preset::default(),
        };

        let mut config = Self::from_preset(preset);
        if let Some(overrides) = file.overrides {
            overrides.apply(&mut config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Export as YAML schema v1 (custom preset with every field overridden)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: Some(Preset::Custom.as_str().to_string()),
            overrides: Some(ExplorationOverrides {
                max_visited_pairs: Some(self.max_visited_pairs),
                max_steps: Some(self.max_steps),
                reset_operations_at_block_boundary: Some(self.reset_operations_at_block_boundary),
                learn_branch_constraints: Some(self.learn_branch_constraints),
                parallel: Some(self.parallel),
            }),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Validatable for ExplorationConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_visited_pairs == 0 || self.max_visited_pairs > MAX_VISITED_PAIRS_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_visited_pairs",
                self.max_visited_pairs,
                1,
                MAX_VISITED_PAIRS_LIMIT,
                "At least the entry state must be visited",
            ));
        }

        if self.max_steps == 0 || self.max_steps > MAX_STEPS_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_steps",
                self.max_steps,
                1,
                MAX_STEPS_LIMIT,
                "Step budget must be finite",
            ));
        }

        // Every visited pair costs one step, a smaller step budget makes the pair cap dead
        if self.max_steps < self.max_visited_pairs {
            return Err(ConfigError::Validation(format!(
                "max_steps ({}) must be >= max_visited_pairs ({})",
                self.max_steps, self.max_visited_pairs
            )));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ExplorationConfig"
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    preset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    overrides: Option<ExplorationOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExplorationOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_visited_pairs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_operations_at_block_boundary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    learn_branch_constraints: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel: Option<bool>,
}

impl ExplorationOverrides {
    fn apply(self, config: &mut ExplorationConfig) {
        if let Some(v) = self.max_visited_pairs {
            config.max_visited_pairs = v;
        }
        if let Some(v) = self.max_steps {
            config.max_steps = v;
        }
        if let Some(v) = self.reset_operations_at_block_boundary {
            config.reset_operations_at_block_boundary = v;
        }
        if let Some(v) = self.learn_branch_constraints {
            config.learn_branch_constraints = v;
        }
        if let Some(v) = self.parallel {
            config.parallel = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_presets_validate() {
        for preset in [
            Preset::Fast,
            Preset::Balanced,
            Preset::Thorough,
            Preset::Custom,
        ] {
            assert!(ExplorationConfig::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_zero_visited_pairs_rejected() {
        let config = ExplorationConfig::default().max_visited_pairs(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "max_visited_pairs"));
    }

    #[test]
    fn test_step_budget_below_pair_cap_rejected() {
        let config = ExplorationConfig::default()
            .max_visited_pairs(1_000)
            .max_steps(10);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_overrides_applied() {
        let yaml = r#"
version: 1
preset: fast
overrides:
  max_steps: 50000
  learn_branch_constraints: false
"#;
        let config = ExplorationConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_visited_pairs, 2_000);
        assert_eq!(config.max_steps, 50_000);
        assert!(!config.learn_branch_constraints);
        assert!(config.reset_operations_at_block_boundary);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = ExplorationConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = ExplorationConfig::from_yaml_str("version: 2\npreset: fast\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let yaml = "version: 1\noverrides:\n  max_depth: 3\n";
        assert!(matches!(
            ExplorationConfig::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let config = ExplorationConfig::from_preset(Preset::Thorough).parallel(false);
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();
        let path = temp_file.path().to_str().unwrap();

        let recovered = ExplorationConfig::from_yaml(path).unwrap();
        assert_eq!(recovered, config);
    }
}
