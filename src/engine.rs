//! The analysis engine facade: catalog + classifier + fusion behind the
//! three call-level contracts collaborators use (`parse`, `metrics`,
//! `analyze`).
//!
//! Construction is explicit and injectable rather than a module-level
//! singleton: building the engine validates the catalog and trains the
//! classifier to completion, so a constructed value is always ready and
//! immutable. One engine per process shared by reference is the intended
//! lifetime; everything on it is `Send + Sync` with no locking because no
//! shared mutable state exists after construction.

use crate::classifier::DefectClassifier;
use crate::config::AnalysisConfig;
use crate::core::{DefectPrediction, Language, MetricsRecord, ParseResult};
use crate::patterns::{self, smells, RuleCatalog};
use crate::risk::ScoreFusion;
use crate::{analyzers, metrics};
use anyhow::Result;

pub struct DefectAnalyzer {
    catalog: RuleCatalog,
    classifier: DefectClassifier,
    fusion: ScoreFusion,
    config: AnalysisConfig,
}

impl DefectAnalyzer {
    /// Build an engine with default configuration. Fails fast on catalog
    /// or configuration defects; never fails on input code.
    pub fn new() -> Result<Self> {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let catalog = RuleCatalog::builtin()?;
        let classifier = DefectClassifier::train(config.classifier_seed);
        let fusion = ScoreFusion::new(config.fusion.clone(), config.severity_weights.clone());

        Ok(Self {
            catalog,
            classifier,
            fusion,
            config,
        })
    }

    /// Structural model of the snippet.
    pub fn parse(&self, code: &str, language: Language) -> ParseResult {
        analyzers::parse(code, language)
    }

    /// Size and shape statistics for the snippet.
    pub fn metrics(&self, code: &str, language: Language) -> MetricsRecord {
        metrics::metrics(code, language)
    }

    /// Full defect analysis: rule scan + code smells + classifier, fused
    /// into a bounded risk score.
    pub fn analyze(&self, code: &str, language: Language) -> DefectPrediction {
        let flagged = patterns::scan(code, language, &self.catalog);

        let mut issues = patterns::issue_summaries(&flagged);
        issues.extend(smells::detect_code_smells(code, &self.config.smells));

        let ml_probability = self.classifier.classify(code);
        self.fusion.fuse(
            flagged,
            ml_probability,
            self.classifier.confidence(),
            issues,
        )
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &DefectClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}
