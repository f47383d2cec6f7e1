//! Threshold-based code smells.
//!
//! Smells are distinct from rule hits: they have no fixed severity/rule-id
//! pairing, so they contribute free-text issue summaries only, never
//! `FlaggedSection`s.

use crate::config::SmellThresholds;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static BOOL_OP_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"(and|or|&&|\|\|)")
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// Detect long lines, deep nesting and complex conditions, in that order,
/// each as a full pass over the lines.
pub fn detect_code_smells(code: &str, thresholds: &SmellThresholds) -> Vec<String> {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut issues = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let width = line.chars().count();
        if width > thresholds.max_line_length {
            issues.push(format!(
                "Line {}: Line too long (> {} chars) ({} chars)",
                idx + 1,
                thresholds.max_line_length,
                width
            ));
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        let nesting = nesting_level(line, thresholds.indent_width);
        if nesting > thresholds.max_nesting_depth {
            issues.push(format!(
                "Line {}: Deep nesting level (> {}) (level {})",
                idx + 1,
                thresholds.max_nesting_depth,
                nesting
            ));
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        let operators = BOOL_OP_RE.find_iter(line).count();
        if operators > thresholds.max_condition_operators {
            issues.push(format!(
                "Line {}: Complex boolean condition (> {} operators)",
                idx + 1,
                thresholds.max_condition_operators
            ));
        }
    }

    issues
}

/// Nesting depth inferred from leading whitespace width, floored.
fn nesting_level(line: &str, indent_width: usize) -> usize {
    let leading = line.chars().take_while(|c| c.is_whitespace()).count();
    leading / indent_width
}
