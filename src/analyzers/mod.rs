//! Per-language structural extraction.
//!
//! Dispatch is a closed, exhaustive match over [`Language`]: every variant
//! is wired to an extractor or to the explicit generic fallback, so a new
//! language variant fails to compile until a decision is made here.

pub mod generic;
pub mod java;
pub mod javascript;
pub mod python;

use crate::core::{Language, ParseResult};

/// Parse a snippet into its structural model.
///
/// Never fails: unsupported languages and syntax errors degrade inside
/// `ParseResult.errors` (see the crate-level error policy).
pub fn parse(code: &str, language: Language) -> ParseResult {
    match language {
        Language::Python => python::parse(code),
        Language::JavaScript | Language::TypeScript => javascript::parse(code, language),
        Language::Java => java::parse(code),
        Language::Cpp | Language::Go => generic::parse(code, language),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_routes_to_the_grammar_extractor() {
        let result = parse("def f():\n    pass\n", Language::Python);
        assert_eq!(result.language, Language::Python);
        assert_eq!(result.functions.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn typescript_shares_the_javascript_extractor() {
        let result = parse("function f() {}\n", Language::TypeScript);
        assert_eq!(result.language, Language::TypeScript);
        assert_eq!(result.functions.len(), 1);
    }

    #[test]
    fn go_degrades_to_the_fallback() {
        let result = parse("func main() {}\n", Language::Go);
        assert_eq!(result.errors.len(), 1);
        assert!(result.functions.is_empty());
    }

    #[test]
    fn parse_never_panics_on_arbitrary_bytes() {
        for lang in Language::all() {
            let result = parse("\u{0}\u{1} ... {{{ ]]] \"", *lang);
            assert!(result.complexity_score >= 0.0);
        }
    }
}
