//! Property tests for the bounded-score contract and the metric identities.

use defectlens::core::{FlaggedSection, ParseResult};
use defectlens::metrics::metrics_from_parse;
use defectlens::{Language, RiskLevel, RuleCatalog, ScoreFusion, Severity};
use proptest::prelude::*;

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Error),
        Just(Severity::Security),
        Just(Severity::Warning),
        Just(Severity::Info),
        Just(Severity::Suggestion),
    ]
}

fn flagged_strategy() -> impl Strategy<Value = Vec<FlaggedSection>> {
    prop::collection::vec(
        (severity_strategy(), 1usize..10_000).prop_map(|(severity, line)| FlaggedSection {
            line,
            code: "flagged line".to_string(),
            issue: "issue".to_string(),
            severity,
            rule_id: "prop/rule".to_string(),
        }),
        0..64,
    )
}

proptest! {
    #[test]
    fn fused_score_is_always_bounded_and_level_consistent(
        flagged in flagged_strategy(),
        ml in 0.0f64..=1.0,
    ) {
        let fusion = ScoreFusion::default();
        let prediction = fusion.fuse(flagged, ml, 0.8, Vec::new());

        prop_assert!((0.0..=1.0).contains(&prediction.risk_score));

        let expected = if prediction.risk_score >= 0.7 {
            RiskLevel::High
        } else if prediction.risk_score >= 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        prop_assert_eq!(prediction.risk_level, expected);
    }

    #[test]
    fn fuse_is_a_pure_function(
        flagged in flagged_strategy(),
        ml in 0.0f64..=1.0,
    ) {
        let fusion = ScoreFusion::default();
        let first = fusion.fuse(flagged.clone(), ml, 0.8, Vec::new());
        let second = fusion.fuse(flagged, ml, 0.8, Vec::new());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn line_kind_counts_partition_total_lines(
        lines in prop::collection::vec("[ -~]{0,40}", 0..20),
    ) {
        let code = lines.join("\n");
        let parse = ParseResult::empty(Language::Python, 5.0);
        let record = metrics_from_parse(&code, &parse);
        prop_assert_eq!(
            record.code_lines + record.blank_lines + record.comment_lines,
            record.total_lines
        );
    }

    #[test]
    fn scan_order_is_stable(
        lines in prop::collection::vec("[ -~]{0,40}", 0..10),
    ) {
        let code = lines.join("\n");
        let catalog = RuleCatalog::builtin().unwrap();
        let first = defectlens::scan(&code, Language::Python, &catalog);
        let second = defectlens::scan(&code, Language::Python, &catalog);
        prop_assert_eq!(&first, &second);

        // rule-major output: sections sharing a rule id appear with
        // ascending line numbers
        for pair in first.windows(2) {
            if pair[0].rule_id == pair[1].rule_id {
                prop_assert!(pair[0].line <= pair[1].line);
            }
        }
    }
}

#[test]
fn python_complexity_is_monotonic_in_conditional_count() {
    let mut previous = defectlens::parse("", Language::Python).complexity_score;
    for count in 1..=30 {
        let code: String = (0..count)
            .map(|i| format!("if flag{i}:\n    run{i}()\n"))
            .collect();
        let score = defectlens::parse(&code, Language::Python).complexity_score;
        assert!(
            score >= previous,
            "adding a conditional lowered complexity: {previous} -> {score}"
        );
        previous = score;
    }
    assert_eq!(previous, 100.0_f64.min(5.0 * 31.0));
}

#[test]
fn heuristic_complexity_is_monotonic_in_branch_count() {
    let mut previous = defectlens::parse("", Language::JavaScript).complexity_score;
    for count in 1..=60 {
        let code: String = (0..count).map(|i| format!("if (f{i}) {{ g(); }}\n")).collect();
        let score = defectlens::parse(&code, Language::JavaScript).complexity_score;
        assert!(score >= previous);
        previous = score;
    }
    assert_eq!(previous, 100.0);
}
