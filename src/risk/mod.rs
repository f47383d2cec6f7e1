//! Score fusion: rule hits + classifier probability -> one bounded risk score.
//!
//! The formula is a fixed policy, not learned:
//! `pattern = min(1, sum(severity weights) / 5)`,
//! `risk = clamp(0.4 * ml + 0.6 * pattern, 0, 1)` rounded to 3 decimals,
//! with `high >= 0.7`, `medium >= 0.4`, `low` otherwise. The weights are
//! exposed as config tunables; the shape of the formula is not.

use crate::config::{FusionWeights, SeverityWeights};
use crate::core::{DefectPrediction, FlaggedSection, RiskLevel, Severity};
use std::collections::BTreeMap;

/// Severity-weight sum that maps to a saturated pattern score.
pub const PATTERN_SCORE_NORMALIZER: f64 = 5.0;

pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Fuses rule-engine output with the classifier probability. Pure: identical
/// inputs always produce identical scores and levels.
#[derive(Debug, Clone, Default)]
pub struct ScoreFusion {
    weights: FusionWeights,
    severity_weights: SeverityWeights,
}

impl ScoreFusion {
    pub fn new(weights: FusionWeights, severity_weights: SeverityWeights) -> Self {
        Self {
            weights,
            severity_weights,
        }
    }

    /// Severity-weighted pattern score in `[0, 1]`.
    pub fn pattern_score(&self, flagged: &[FlaggedSection]) -> f64 {
        let total: f64 = flagged
            .iter()
            .map(|section| self.severity_weights.weight(section.severity))
            .sum();
        1.0_f64.min(total / PATTERN_SCORE_NORMALIZER)
    }

    /// Blend the two signals into a bounded score, rounded to 3 decimals.
    pub fn risk_score(&self, ml_probability: f64, pattern_score: f64) -> f64 {
        let blended =
            self.weights.ml_weight * ml_probability + self.weights.pattern_weight * pattern_score;
        round3(blended.clamp(0.0, 1.0))
    }

    pub fn risk_level(score: f64) -> RiskLevel {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Assemble the final prediction from the rule hits, the classifier
    /// probability and the already-collected issue summaries.
    pub fn fuse(
        &self,
        flagged: Vec<FlaggedSection>,
        ml_probability: f64,
        confidence: f64,
        issues_detected: Vec<String>,
    ) -> DefectPrediction {
        let pattern = self.pattern_score(&flagged);
        let risk_score = self.risk_score(ml_probability, pattern);

        DefectPrediction {
            risk_score,
            risk_level: Self::risk_level(risk_score),
            flagged_sections: flagged,
            confidence,
            issues_detected,
        }
    }
}

/// Count flagged sections per severity over the full severity set; absent
/// severities report zero.
pub fn summarize(flagged: &[FlaggedSection]) -> BTreeMap<Severity, usize> {
    let mut summary: BTreeMap<Severity, usize> =
        Severity::all().iter().map(|sev| (*sev, 0)).collect();
    for section in flagged {
        *summary.entry(section.severity).or_insert(0) += 1;
    }
    summary
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(severity: Severity) -> FlaggedSection {
        FlaggedSection {
            line: 1,
            code: "x".to_string(),
            issue: "issue".to_string(),
            severity,
            rule_id: "test/rule".to_string(),
        }
    }

    fn fusion() -> ScoreFusion {
        ScoreFusion::default()
    }

    #[test]
    fn pattern_score_sums_severity_weights() {
        let flagged = vec![
            section(Severity::Error),      // 1.0
            section(Severity::Security),   // 0.9
            section(Severity::Suggestion), // 0.1
        ];
        assert_eq!(fusion().pattern_score(&flagged), 2.0 / 5.0);
    }

    #[test]
    fn pattern_score_saturates_at_one() {
        let flagged = vec![section(Severity::Error); 10];
        assert_eq!(fusion().pattern_score(&flagged), 1.0);
    }

    #[test]
    fn empty_flagged_scores_zero() {
        assert_eq!(fusion().pattern_score(&[]), 0.0);
    }

    #[test]
    fn risk_score_blends_and_rounds() {
        let fusion = fusion();
        // 0.4 * 0.5 + 0.6 * 0.2 = 0.32
        assert_eq!(fusion.risk_score(0.5, 0.2), 0.32);
        // rounding to 3 decimals
        assert_eq!(fusion.risk_score(1.0 / 3.0, 0.0), 0.133);
    }

    #[test]
    fn risk_levels_follow_thresholds() {
        assert_eq!(ScoreFusion::risk_level(0.0), RiskLevel::Low);
        assert_eq!(ScoreFusion::risk_level(0.399), RiskLevel::Low);
        assert_eq!(ScoreFusion::risk_level(0.4), RiskLevel::Medium);
        assert_eq!(ScoreFusion::risk_level(0.699), RiskLevel::Medium);
        assert_eq!(ScoreFusion::risk_level(0.7), RiskLevel::High);
        assert_eq!(ScoreFusion::risk_level(1.0), RiskLevel::High);
    }

    #[test]
    fn fuse_is_deterministic() {
        let fusion = fusion();
        let flagged = vec![section(Severity::Warning), section(Severity::Error)];
        let first = fusion.fuse(flagged.clone(), 0.42, 0.8, vec!["issue".to_string()]);
        let second = fusion.fuse(flagged, 0.42, 0.8, vec!["issue".to_string()]);
        assert_eq!(first, second);
    }

    #[test]
    fn fused_score_is_bounded_for_extremes() {
        let fusion = fusion();
        let heavy = vec![section(Severity::Error); 50];
        let prediction = fusion.fuse(heavy, 1.0, 0.8, Vec::new());
        assert!(prediction.risk_score <= 1.0);
        assert_eq!(prediction.risk_level, RiskLevel::High);

        let clean = fusion.fuse(Vec::new(), 0.0, 0.8, Vec::new());
        assert_eq!(clean.risk_score, 0.0);
        assert_eq!(clean.risk_level, RiskLevel::Low);
    }

    #[test]
    fn summary_defaults_absent_severities_to_zero() {
        let flagged = vec![section(Severity::Error), section(Severity::Error)];
        let summary = summarize(&flagged);
        assert_eq!(summary.len(), 5);
        assert_eq!(summary[&Severity::Error], 2);
        assert_eq!(summary[&Severity::Security], 0);
        assert_eq!(summary[&Severity::Suggestion], 0);
    }
}
