//! Regex-based approximate extractor for Java.
//!
//! Same precision trade-off as the JavaScript extractor: declaration-site
//! pattern matches only, no grammar. Method bodies are not delimited, so
//! functions report a single-line span.

use crate::complexity;
use crate::core::{ClassEntity, FunctionEntity, Language, Parameter, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"import\s+([\w.]+);").unwrap());

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:public\s+)?(?:abstract\s+)?class\s+(\w+)(?:\s+extends\s+(\w+))?(?:\s+implements\s+([\w,\s]+))?\s*\{",
    )
    .unwrap()
});

static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:public|private|protected)?\s*(?:static\s+)?(?:final\s+)?(\w+(?:<[^>]+>)?)\s+(\w+)\s*\(([^)]*)\)\s*(?:throws\s+[\w,\s]+)?\s*\{",
    )
    .unwrap()
});

/// Control keywords the method pattern can false-positive on.
const KEYWORD_NAMES: &[&str] = &["if", "while", "for", "switch", "try", "catch"];

pub fn parse(code: &str) -> ParseResult {
    let imports = IMPORT_RE
        .captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    let mut classes = Vec::new();
    for caps in CLASS_RE.captures_iter(code) {
        let whole = caps.get(0).unwrap();
        let line = line_of(code, whole.start());

        let mut bases = Vec::new();
        if let Some(base) = caps.get(2) {
            bases.push(base.as_str().to_string());
        }
        if let Some(interfaces) = caps.get(3) {
            bases.extend(
                interfaces
                    .as_str()
                    .split(',')
                    .map(|name| name.trim().to_string()),
            );
        }

        classes.push(ClassEntity {
            name: caps.get(1).unwrap().as_str().to_string(),
            start_line: line,
            end_line: line,
            bases,
            methods: Vec::new(),
            attributes: Vec::new(),
            docstring: None,
            decorators: Vec::new(),
        });
    }

    let mut functions = Vec::new();
    for caps in METHOD_RE.captures_iter(code) {
        let whole = caps.get(0).unwrap();
        let return_type = caps.get(1).unwrap().as_str();
        let name = caps.get(2).unwrap().as_str();
        let params = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        let line = line_of(code, whole.start());

        if KEYWORD_NAMES.contains(&name) {
            continue;
        }

        functions.push(FunctionEntity {
            name: name.to_string(),
            start_line: line,
            end_line: line,
            signature: format!("{return_type} {name}({params})"),
            parameters: parse_parameters(params),
            return_type: Some(return_type.to_string()),
            body: String::new(),
            decorators: Vec::new(),
            docstring: None,
            is_async: false,
            is_method: false,
            class_name: None,
        });
    }

    ParseResult {
        language: Language::Java,
        functions,
        classes,
        imports,
        global_variables: Vec::new(),
        errors: Vec::new(),
        complexity_score: complexity::estimate_from_text(code),
    }
}

fn parse_parameters(params: &str) -> Vec<Parameter> {
    if params.trim().is_empty() {
        return Vec::new();
    }

    params
        .split(',')
        .filter_map(|param| {
            let parts: Vec<&str> = param.trim().split_whitespace().collect();
            if parts.len() >= 2 {
                Some(Parameter {
                    name: parts[parts.len() - 1].to_string(),
                    declared_type: Some(parts[..parts.len() - 1].join(" ")),
                    default_literal: None,
                })
            } else {
                None
            }
        })
        .collect()
}

fn line_of(code: &str, idx: usize) -> usize {
    code[..idx].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn class_with_extends_and_implements() {
        let code = "public class OrderService extends Base implements Runnable, Closeable {\n}\n";
        let result = parse(code);
        assert_eq!(result.classes.len(), 1);
        let class = &result.classes[0];
        assert_eq!(class.name, "OrderService");
        assert_eq!(class.bases, vec!["Base", "Runnable", "Closeable"]);
    }

    #[test]
    fn method_with_typed_parameters() {
        let code = indoc! {r#"
            public class Calc {
                public int add(int a, int b) {
                    return a + b;
                }
            }
        "#};
        let result = parse(code);
        let method = result
            .functions
            .iter()
            .find(|f| f.name == "add")
            .expect("add method extracted");
        assert_eq!(method.return_type.as_deref(), Some("int"));
        assert_eq!(method.parameters.len(), 2);
        assert_eq!(method.parameters[0].name, "a");
        assert_eq!(method.parameters[0].declared_type.as_deref(), Some("int"));
        assert_eq!(method.signature, "int add(int a, int b)");
    }

    #[test]
    fn control_keywords_are_not_methods() {
        let code = indoc! {r#"
            public class Guard {
                public void check(boolean flag) {
                    if (flag) {
                        run();
                    }
                }
            }
        "#};
        let result = parse(code);
        assert!(result.functions.iter().all(|f| f.name != "if"));
        assert!(result.functions.iter().any(|f| f.name == "check"));
    }

    #[test]
    fn imports_are_dotted_paths() {
        let code = "import java.util.List;\nimport java.io.IOException;\n";
        let result = parse(code);
        assert_eq!(result.imports, vec!["java.util.List", "java.io.IOException"]);
    }

    #[test]
    fn generic_return_type_is_captured() {
        let code = "public class Box {\n    public List<String> names() {\n        return items;\n    }\n}\n";
        let result = parse(code);
        let method = result.functions.iter().find(|f| f.name == "names").unwrap();
        assert_eq!(method.return_type.as_deref(), Some("List<String>"));
    }
}
