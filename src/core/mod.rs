pub mod errors;

use serde::{Deserialize, Serialize};

/// Languages the engine knows about. Dispatch over this enum is a closed,
/// exhaustive match: adding a language without wiring an extractor is a
/// compile error, not a silent fallthrough.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    Go,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        static TAGS: &[(Language, &str)] = &[
            (Language::Python, "python"),
            (Language::JavaScript, "javascript"),
            (Language::TypeScript, "typescript"),
            (Language::Java, "java"),
            (Language::Cpp, "cpp"),
            (Language::Go, "go"),
        ];

        TAGS.iter()
            .find(|(lang, _)| lang == self)
            .map(|(_, tag)| *tag)
            .unwrap_or("unknown")
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        static TAGS: &[(&str, Language)] = &[
            ("python", Language::Python),
            ("javascript", Language::JavaScript),
            ("typescript", Language::TypeScript),
            ("java", Language::Java),
            ("cpp", Language::Cpp),
            ("c++", Language::Cpp),
            ("go", Language::Go),
        ];

        let tag = tag.to_lowercase();
        TAGS.iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, lang)| *lang)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["py", "pyi"], Language::Python),
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx", "mts", "cts"], Language::TypeScript),
            (&["java"], Language::Java),
            (&["cpp", "cc", "cxx", "hpp", "h"], Language::Cpp),
            (&["go"], Language::Go),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
    }

    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Java,
            Language::Cpp,
            Language::Go,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue severity attached to rule hits. Ordering reflects weight, heaviest
/// first, and fixes the key order of severity summaries.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Security,
    Warning,
    Info,
    Suggestion,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        static TAGS: &[(Severity, &str)] = &[
            (Severity::Error, "error"),
            (Severity::Security, "security"),
            (Severity::Warning, "warning"),
            (Severity::Info, "info"),
            (Severity::Suggestion, "suggestion"),
        ];

        TAGS.iter()
            .find(|(sev, _)| sev == self)
            .map(|(_, tag)| *tag)
            .unwrap_or("info")
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        static TAGS: &[(&str, Severity)] = &[
            ("error", Severity::Error),
            ("security", Severity::Security),
            ("warning", Severity::Warning),
            ("info", Severity::Info),
            ("suggestion", Severity::Suggestion),
        ];

        TAGS.iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, sev)| *sev)
    }

    pub fn all() -> &'static [Severity] {
        &[
            Severity::Error,
            Severity::Security,
            Severity::Warning,
            Severity::Info,
            Severity::Suggestion,
        ]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Three-level risk classification derived from the fused score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single declared parameter, in declaration order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub declared_type: Option<String>,
    pub default_literal: Option<String>,
}

/// A function or method extracted from source.
///
/// Lines are 1-indexed and inclusive; `end_line >= start_line` always holds.
/// `class_name` is present iff `is_method`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionEntity {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub signature: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub body: String,
    pub decorators: Vec<String>,
    pub docstring: Option<String>,
    pub is_async: bool,
    pub is_method: bool,
    pub class_name: Option<String>,
}

/// A class-level attribute declaration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttributeEntity {
    pub name: String,
    pub declared_type: Option<String>,
    pub line: usize,
}

/// A class extracted from source. Every method's `class_name` equals the
/// owning class's `name`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassEntity {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub bases: Vec<String>,
    pub methods: Vec<FunctionEntity>,
    pub attributes: Vec<AttributeEntity>,
    pub docstring: Option<String>,
    pub decorators: Vec<String>,
}

/// A module-level assignment to a plain name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GlobalVariable {
    pub name: String,
    pub line: usize,
    pub value_repr: String,
}

/// Complete structural model for one parse call.
///
/// A non-empty `errors` sequence signals degraded extraction, not failure:
/// an unsupported language or a syntax error still yields a usable record
/// with a heuristic (or zero) complexity score.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParseResult {
    pub language: Language,
    pub functions: Vec<FunctionEntity>,
    pub classes: Vec<ClassEntity>,
    pub imports: Vec<String>,
    pub global_variables: Vec<GlobalVariable>,
    pub errors: Vec<String>,
    pub complexity_score: f64,
}

impl ParseResult {
    /// An empty structural model for `language` with the given complexity.
    pub fn empty(language: Language, complexity_score: f64) -> Self {
        Self {
            language,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            global_variables: Vec::new(),
            errors: Vec::new(),
            complexity_score,
        }
    }
}

/// One anti-pattern rule hit on one line of source.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FlaggedSection {
    /// 1-indexed line number.
    pub line: usize,
    /// The trimmed source text of the line.
    pub code: String,
    pub issue: String,
    pub severity: Severity,
    pub rule_id: String,
}

/// Fused defect-risk estimate for one analysis call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DefectPrediction {
    /// Bounded risk score in `[0.0, 1.0]`, rounded to 3 decimal places.
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub flagged_sections: Vec<FlaggedSection>,
    pub confidence: f64,
    pub issues_detected: Vec<String>,
}

/// Size and shape statistics for one snippet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricsRecord {
    pub total_lines: usize,
    pub code_lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub import_count: usize,
    pub complexity_score: f64,
    pub avg_function_length: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_tag(lang.as_str()), Some(*lang));
        }
    }

    #[test]
    fn language_from_tag_is_case_insensitive() {
        assert_eq!(Language::from_tag("Python"), Some(Language::Python));
        assert_eq!(Language::from_tag("TYPESCRIPT"), Some(Language::TypeScript));
    }

    #[test]
    fn language_from_tag_rejects_unknown() {
        assert_eq!(Language::from_tag("cobol"), None);
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("zig"), None);
    }

    #[test]
    fn severity_tags_round_trip() {
        for sev in Severity::all() {
            assert_eq!(Severity::from_tag(sev.as_str()), Some(*sev));
        }
    }

    #[test]
    fn severity_orders_heaviest_first() {
        assert!(Severity::Error < Severity::Security);
        assert!(Severity::Security < Severity::Warning);
        assert!(Severity::Info < Severity::Suggestion);
    }

    #[test]
    fn serde_tags_are_lowercase() {
        let json = serde_json::to_string(&Language::TypeScript).unwrap();
        assert_eq!(json, "\"typescript\"");
        let json = serde_json::to_string(&Severity::Security).unwrap();
        assert_eq!(json, "\"security\"");
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
