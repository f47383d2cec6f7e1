//! Analysis configuration: smell thresholds and score-fusion weights.
//!
//! Every value here is a documented tunable with the engine's policy
//! constants as defaults. The fused-score formula itself is fixed for
//! reproducibility; only its weights live here.

use crate::core::errors::ConfigError;
use crate::core::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default seed for synthetic-corpus generation, so classifier training is
/// reproducible across process starts.
pub const DEFAULT_CLASSIFIER_SEED: u64 = 0xD1CE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub smells: SmellThresholds,
    pub fusion: FusionWeights,
    pub severity_weights: SeverityWeights,
    /// Seed for the synthetic training corpus generator.
    pub classifier_seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            smells: SmellThresholds::default(),
            fusion: FusionWeights::default(),
            severity_weights: SeverityWeights::default(),
            classifier_seed: DEFAULT_CLASSIFIER_SEED,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// absent keys.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smells.validate()?;
        self.fusion.validate()?;
        self.severity_weights.validate()
    }
}

/// Thresholds for the code-smell detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmellThresholds {
    pub max_line_length: usize,
    pub max_nesting_depth: usize,
    pub max_condition_operators: usize,
    pub indent_width: usize,
}

impl Default for SmellThresholds {
    fn default() -> Self {
        Self {
            max_line_length: 120,
            max_nesting_depth: 4,
            max_condition_operators: 3,
            indent_width: 4,
        }
    }
}

impl SmellThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width == 0 {
            return Err(ConfigError::ZeroThreshold {
                name: "indent_width",
            });
        }
        if self.max_line_length == 0 {
            return Err(ConfigError::ZeroThreshold {
                name: "max_line_length",
            });
        }
        Ok(())
    }
}

/// Blend weights for the fused risk score:
/// `risk = clamp(ml_weight * ml + pattern_weight * pattern, 0, 1)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub ml_weight: f64,
    pub pattern_weight: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            ml_weight: 0.4,
            pattern_weight: 0.6,
        }
    }
}

impl FusionWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_unit_weight("ml_weight", self.ml_weight)?;
        validate_unit_weight("pattern_weight", self.pattern_weight)
    }
}

/// Per-severity contribution to the pattern score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub error: f64,
    pub security: f64,
    pub warning: f64,
    pub info: f64,
    pub suggestion: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            error: 1.0,
            security: 0.9,
            warning: 0.5,
            info: 0.2,
            suggestion: 0.1,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Error => self.error,
            Severity::Security => self.security,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
            Severity::Suggestion => self.suggestion,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_unit_weight("error", self.error)?;
        validate_unit_weight("security", self.security)?;
        validate_unit_weight("warning", self.warning)?;
        validate_unit_weight("info", self.info)?;
        validate_unit_weight("suggestion", self.suggestion)
    }
}

fn validate_unit_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::WeightOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_the_policy_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.fusion.ml_weight, 0.4);
        assert_eq!(config.fusion.pattern_weight, 0.6);
        assert_eq!(config.severity_weights.error, 1.0);
        assert_eq!(config.severity_weights.security, 0.9);
        assert_eq!(config.severity_weights.suggestion, 0.1);
        assert_eq!(config.smells.max_line_length, 120);
        assert_eq!(config.smells.max_nesting_depth, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[smells]\nmax_line_length = 100\n").unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.smells.max_line_length, 100);
        assert_eq!(config.smells.max_nesting_depth, 4);
        assert_eq!(config.fusion.ml_weight, 0.4);
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fusion]\nml_weight = 1.5\n").unwrap();
        let err = AnalysisConfig::from_file(file.path());
        assert!(matches!(err, Err(ConfigError::WeightOutOfRange { .. })));
    }

    #[test]
    fn severity_weight_lookup() {
        let weights = SeverityWeights::default();
        assert_eq!(weights.weight(Severity::Error), 1.0);
        assert_eq!(weights.weight(Severity::Info), 0.2);
    }
}
