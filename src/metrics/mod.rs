//! Size and shape statistics derived from raw text and the structural model.

use crate::analyzers;
use crate::core::{FunctionEntity, Language, MetricsRecord, ParseResult};

/// Line prefixes treated as comments across the supported languages.
const COMMENT_MARKERS: &[&str] = &["#", "//", "/*", "*"];

/// Compute metrics for a snippet, parsing it first.
pub fn metrics(code: &str, language: Language) -> MetricsRecord {
    let parse_result = analyzers::parse(code, language);
    metrics_from_parse(code, &parse_result)
}

/// Compute metrics from raw text and an existing parse result.
///
/// Pure function: `code_lines + blank_lines + comment_lines == total_lines`
/// for any input, including empty input (all zero).
pub fn metrics_from_parse(code: &str, parse_result: &ParseResult) -> MetricsRecord {
    let lines: Vec<&str> = if code.is_empty() {
        Vec::new()
    } else {
        code.split('\n').collect()
    };
    let total_lines = lines.len();
    let blank_lines = lines.iter().filter(|line| line.trim().is_empty()).count();
    let comment_lines = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m))
        })
        .count();
    let code_lines = total_lines - blank_lines - comment_lines;

    MetricsRecord {
        total_lines,
        code_lines,
        blank_lines,
        comment_lines,
        function_count: parse_result.functions.len(),
        class_count: parse_result.classes.len(),
        import_count: parse_result.imports.len(),
        complexity_score: parse_result.complexity_score,
        avg_function_length: avg_function_length(&parse_result.functions),
    }
}

fn avg_function_length(functions: &[FunctionEntity]) -> f64 {
    if functions.is_empty() {
        return 0.0;
    }

    let total: usize = functions
        .iter()
        .map(|f| f.end_line - f.start_line + 1)
        .sum();
    total as f64 / functions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameter;

    fn function(start_line: usize, end_line: usize) -> FunctionEntity {
        FunctionEntity {
            name: "f".to_string(),
            start_line,
            end_line,
            signature: "def f()".to_string(),
            parameters: Vec::<Parameter>::new(),
            return_type: None,
            body: String::new(),
            decorators: Vec::new(),
            docstring: None,
            is_async: false,
            is_method: false,
            class_name: None,
        }
    }

    #[test]
    fn line_kinds_partition_total() {
        let code = "# header\n\nx = 1\n// note\n   \ny = 2\n";
        let parse = ParseResult::empty(Language::Python, 5.0);
        let record = metrics_from_parse(code, &parse);

        assert_eq!(record.total_lines, 7);
        assert_eq!(record.blank_lines, 3);
        assert_eq!(record.comment_lines, 2);
        assert_eq!(record.code_lines, 2);
        assert_eq!(
            record.code_lines + record.blank_lines + record.comment_lines,
            record.total_lines
        );
    }

    #[test]
    fn empty_input_counts_all_zero() {
        let parse = ParseResult::empty(Language::Python, 5.0);
        let record = metrics_from_parse("", &parse);
        assert_eq!(record.total_lines, 0);
        assert_eq!(record.blank_lines, 0);
        assert_eq!(record.comment_lines, 0);
        assert_eq!(record.code_lines, 0);
        assert_eq!(record.avg_function_length, 0.0);
    }

    #[test]
    fn block_comment_continuation_counts_as_comment() {
        let code = "/*\n * body\n */\ncode();";
        let parse = ParseResult::empty(Language::JavaScript, 2.0);
        let record = metrics_from_parse(code, &parse);
        assert_eq!(record.comment_lines, 3);
        assert_eq!(record.code_lines, 1);
    }

    #[test]
    fn average_function_length_is_inclusive_of_both_ends() {
        let mut parse = ParseResult::empty(Language::Python, 5.0);
        parse.functions.push(function(1, 4));
        parse.functions.push(function(10, 11));
        let record = metrics_from_parse("x = 1", &parse);
        // lengths 4 and 2
        assert_eq!(record.avg_function_length, 3.0);
    }
}
