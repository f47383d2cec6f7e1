//! Startup-time error taxonomy.
//!
//! Malformed *input code* is never an error anywhere in the engine: the
//! expected domain is broken snippets, and degradation is reported inside
//! `ParseResult.errors`. The only failures that propagate are configuration
//! defects caught while building the engine, and those fail fast.

use thiserror::Error;

/// A defect in the anti-pattern rule catalog, rejected at construction so
/// that `scan` itself cannot fail on valid input.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule '{rule_id}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule_id}' has unknown severity tag '{tag}'")]
    InvalidSeverity { rule_id: String, tag: String },
}

/// A defect in the analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fusion weight '{name}' must be in [0.0, 1.0], got {value}")]
    WeightOutOfRange { name: &'static str, value: f64 },

    #[error("smell threshold '{name}' must be non-zero")]
    ZeroThreshold { name: &'static str },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
