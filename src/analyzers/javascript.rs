//! Regex-based approximate extractor for JavaScript and TypeScript.
//!
//! There is no grammar walk here: functions are recognized from a small
//! ordered set of declaration patterns and their bodies delimited by
//! brace-balance matching. Unterminated blocks consume to end of text.
//! The approximation is a compatibility surface (see DESIGN.md): the
//! patterns and the block scan stay fixed rather than growing per-caller
//! fixes.

use crate::complexity;
use crate::core::{ClassEntity, FunctionEntity, Language, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(?:\{[^}]+\}|\*\s+as\s+\w+|\w+)\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});

/// Declaration patterns, in evaluation order: named function declarations,
/// arrow-function assignments, function-expression assignments.
static FUNC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:async\s+)?function\s+(\w+)\s*\(([^)]*)\)\s*(?::\s*(\w+))?\s*\{").unwrap(),
        Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?\([^)]*\)\s*(?::\s*(\w+))?\s*=>\s*\{?")
            .unwrap(),
        Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?function\s*\([^)]*\)").unwrap(),
    ]
});

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+(\w+)(?:\s+extends\s+(\w+))?\s*\{").unwrap());

pub fn parse(code: &str, language: Language) -> ParseResult {
    let imports = IMPORT_RE
        .captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    let mut functions = Vec::new();
    for pattern in FUNC_PATTERNS.iter() {
        for caps in pattern.captures_iter(code) {
            let whole = caps.get(0).unwrap();
            let name = caps.get(1).unwrap().as_str().to_string();
            let start_line = line_of(code, whole.start());

            let (body, end_line) = match code[whole.start()..].find('{') {
                Some(rel) => {
                    let (body, end_idx) = matching_brace_block(code, whole.start() + rel);
                    (body.to_string(), line_of(code, end_idx))
                }
                None => (String::new(), start_line),
            };

            functions.push(FunctionEntity {
                name,
                start_line,
                end_line,
                signature: whole.as_str().to_string(),
                parameters: Vec::new(),
                return_type: None,
                body,
                decorators: Vec::new(),
                docstring: None,
                is_async: whole.as_str().contains("async"),
                is_method: false,
                class_name: None,
            });
        }
    }

    let mut classes = Vec::new();
    for caps in CLASS_RE.captures_iter(code) {
        let whole = caps.get(0).unwrap();
        let line = line_of(code, whole.start());
        classes.push(ClassEntity {
            name: caps.get(1).unwrap().as_str().to_string(),
            start_line: line,
            end_line: line,
            bases: caps
                .get(2)
                .map(|base| vec![base.as_str().to_string()])
                .unwrap_or_default(),
            methods: Vec::new(),
            attributes: Vec::new(),
            docstring: None,
            decorators: Vec::new(),
        });
    }

    ParseResult {
        language,
        functions,
        classes,
        imports,
        global_variables: Vec::new(),
        errors: Vec::new(),
        complexity_score: complexity::estimate_from_text(code),
    }
}

/// 1-indexed line number of a byte offset.
fn line_of(code: &str, idx: usize) -> usize {
    code[..idx].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Scan forward from an opening brace to its balanced close.
///
/// Returns the block text (braces included) and the index of the closing
/// brace. An unterminated block consumes to end of text.
fn matching_brace_block(code: &str, start: usize) -> (&str, usize) {
    let mut depth = 0usize;
    for (offset, byte) in code[start..].bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset;
                    return (&code[start..=end], end);
                }
            }
            _ => {}
        }
    }
    (&code[start..], code.len())
}
