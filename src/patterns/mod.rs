//! Line-oriented anti-pattern scanning.
//!
//! Matching is purely textual: each rule is searched against each line
//! independently, with no structural awareness. False positives inside
//! string and comment literals are accepted in exchange for language
//! independence and zero parse dependency.

pub mod catalog;
pub mod smells;

pub use catalog::{Rule, RuleCatalog};

use crate::core::{FlaggedSection, Language};

/// Scan a snippet against every rule applicable to `language`.
///
/// Output order is rule-major (catalog order), then line-ascending within
/// a rule; a line may match several rules and yields one section per match.
/// Re-running on identical input yields an identical sequence.
pub fn scan(code: &str, language: Language, catalog: &RuleCatalog) -> Vec<FlaggedSection> {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut flagged = Vec::new();

    for rule in catalog.rules_for(language) {
        for (idx, line) in lines.iter().enumerate() {
            if rule.is_match(line) {
                flagged.push(FlaggedSection {
                    line: idx + 1,
                    code: line.trim().to_string(),
                    issue: rule.message.clone(),
                    severity: rule.severity,
                    rule_id: rule.id.clone(),
                });
            }
        }
    }

    flagged
}

/// Human-readable summaries of rule hits, in scan order.
pub fn issue_summaries(flagged: &[FlaggedSection]) -> Vec<String> {
    flagged
        .iter()
        .map(|section| format!("Line {}: {}", section.line, section.issue))
        .collect()
}
