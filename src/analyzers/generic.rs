//! Fallback for languages without a dedicated structural extractor.

use crate::complexity;
use crate::core::{Language, ParseResult};

/// Produce an empty structural model with a heuristic complexity score and
/// a single diagnostic naming the language. Degraded, not failed: callers
/// still get usable metrics out of the result.
pub fn parse(code: &str, language: Language) -> ParseResult {
    log::debug!("no structural extractor for {language}, degrading to heuristic analysis");

    let mut result = ParseResult::empty(language, complexity::estimate_from_text(code));
    result.errors.push(format!(
        "No structural extractor for {language}, using heuristic analysis"
    ));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_exactly_one_diagnostic() {
        let result = parse("package main\nfunc main() {}\n", Language::Go);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("go"));
        assert!(result.functions.is_empty());
        assert!(result.classes.is_empty());
        assert!(result.imports.is_empty());
    }

    #[test]
    fn complexity_comes_from_the_heuristic() {
        let result = parse("if (a) { } else { }", Language::Cpp);
        // base 1 + "if" + "else", scaled by 2
        assert_eq!(result.complexity_score, 6.0);
    }
}
