//! Heuristic complexity estimation for languages without tree-level support.

/// Control-flow keywords and operators counted by the heuristic estimator.
///
/// Occurrences are counted as plain substrings, so `elsewhere` counts for
/// `else` and a `?` inside a string literal counts as a ternary. That
/// imprecision is deliberate: the estimator exists for sources we cannot
/// parse structurally, and the rough signal is kept stable rather than
/// "fixed" per-caller.
const CONTROL_FLOW_TOKENS: &[&str] = &[
    "if", "else", "for", "while", "switch", "case", "try", "catch", "&&", "||", "?",
];

/// Estimate a complexity score in `[0, 100]` from raw text.
///
/// Base complexity 1, plus one per control-flow token occurrence, scaled
/// by 2 and capped at 100.
pub fn estimate_from_text(code: &str) -> f64 {
    let raw = 1 + CONTROL_FLOW_TOKENS
        .iter()
        .map(|token| code.matches(token).count())
        .sum::<usize>();

    100.0_f64.min(raw as f64 * 2.0)
}

/// Scale a raw branch count from a full tree walk into `[0, 100]`.
pub fn scale_tree_count(raw: u32) -> f64 {
    100.0_f64.min(raw as f64 * 5.0)
}
