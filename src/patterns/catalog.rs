//! The anti-pattern rule catalog: versioned, static configuration.
//!
//! Every pattern is compiled and every severity tag parsed when the catalog
//! is built, so a malformed entry is a startup failure and `scan` can never
//! fail on valid input.

use crate::core::errors::CatalogError;
use crate::core::{Language, Severity};
use regex::{Regex, RegexBuilder};

/// One anti-pattern rule. `scope` of `None` is the language-agnostic set
/// applied to every request.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub scope: Option<Language>,
    pub message: String,
    pub severity: Severity,
    pattern: String,
    regex: Regex,
}

impl Rule {
    pub fn new(
        id: &str,
        scope: Option<Language>,
        pattern: &str,
        message: &str,
        severity_tag: &str,
    ) -> Result<Self, CatalogError> {
        let severity =
            Severity::from_tag(severity_tag).ok_or_else(|| CatalogError::InvalidSeverity {
                rule_id: id.to_string(),
                tag: severity_tag.to_string(),
            })?;
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                rule_id: id.to_string(),
                source,
            })?;

        Ok(Self {
            id: id.to_string(),
            scope,
            message: message.to_string(),
            severity,
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Line-local, case-insensitive search.
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Immutable rule table, loaded once at engine construction.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Build the built-in catalog. Errors here are configuration defects
    /// and fail fast.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_specs(BUILTIN_RULES)
    }

    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    fn from_specs(specs: &[RuleSpec]) -> Result<Self, CatalogError> {
        let rules = specs
            .iter()
            .map(|spec| {
                Rule::new(
                    spec.id,
                    spec.language,
                    spec.pattern,
                    spec.message,
                    spec.severity,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("rule catalog loaded: {} rules", rules.len());
        Ok(Self { rules })
    }

    /// Rules applicable to a request: language-scoped rules in catalog
    /// order, then the general set.
    pub fn rules_for(&self, language: Language) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.scope == Some(language))
            .chain(self.rules.iter().filter(|rule| rule.scope.is_none()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

struct RuleSpec {
    id: &'static str,
    language: Option<Language>,
    pattern: &'static str,
    message: &'static str,
    severity: &'static str,
}

const BUILTIN_RULES: &[RuleSpec] = &[
    // Python
    RuleSpec {
        id: "python/bare-except",
        language: Some(Language::Python),
        pattern: r"except\s*:",
        message: "Bare except clause catches all exceptions",
        severity: "error",
    },
    RuleSpec {
        id: "python/eval-call",
        language: Some(Language::Python),
        pattern: r"eval\s*\(",
        message: "Use of eval() is a security risk",
        severity: "security",
    },
    RuleSpec {
        id: "python/exec-call",
        language: Some(Language::Python),
        pattern: r"exec\s*\(",
        message: "Use of exec() is a security risk",
        severity: "security",
    },
    RuleSpec {
        id: "python/wildcard-import",
        language: Some(Language::Python),
        pattern: r"from\s+\w+\s+import\s+\*",
        message: "Wildcard import pollutes namespace",
        severity: "warning",
    },
    RuleSpec {
        id: "python/global-statement",
        language: Some(Language::Python),
        pattern: r"global\s+\w+",
        message: "Global variable usage",
        severity: "warning",
    },
    RuleSpec {
        id: "python/print-statement",
        language: Some(Language::Python),
        pattern: r"print\s*\(.*\)\s*$",
        message: "Debug print statement",
        severity: "info",
    },
    RuleSpec {
        id: "python/todo-comment",
        language: Some(Language::Python),
        pattern: r"#\s*TODO",
        message: "TODO comment found",
        severity: "info",
    },
    RuleSpec {
        id: "python/fixme-comment",
        language: Some(Language::Python),
        pattern: r"#\s*FIXME",
        message: "FIXME comment found",
        severity: "warning",
    },
    RuleSpec {
        id: "python/hack-comment",
        language: Some(Language::Python),
        pattern: r"#\s*HACK",
        message: "HACK comment found",
        severity: "warning",
    },
    RuleSpec {
        id: "python/hardcoded-password",
        language: Some(Language::Python),
        pattern: r#"password\s*=\s*['"]"#,
        message: "Hardcoded password detected",
        severity: "security",
    },
    RuleSpec {
        id: "python/hardcoded-api-key",
        language: Some(Language::Python),
        pattern: r#"api[_-]?key\s*=\s*['"]"#,
        message: "Hardcoded API key detected",
        severity: "security",
    },
    RuleSpec {
        id: "python/sleep-polling",
        language: Some(Language::Python),
        pattern: r"sleep\s*\(\s*\d+\s*\)",
        message: "Sleep call may indicate polling anti-pattern",
        severity: "warning",
    },
    RuleSpec {
        id: "python/broad-except",
        language: Some(Language::Python),
        pattern: r"except\s+Exception\s*:",
        message: "Catching generic Exception",
        severity: "warning",
    },
    RuleSpec {
        id: "python/str-format",
        language: Some(Language::Python),
        pattern: r"\.format\(.*\)\s*$",
        message: "Consider using f-strings for formatting",
        severity: "suggestion",
    },
    RuleSpec {
        id: "python/bare-pass",
        language: Some(Language::Python),
        pattern: r"^\s*pass\s*$",
        message: "Empty block with pass",
        severity: "info",
    },
    RuleSpec {
        id: "python/assert-statement",
        language: Some(Language::Python),
        pattern: r"assert\s+",
        message: "Assert statement (disabled in optimized mode)",
        severity: "warning",
    },
    RuleSpec {
        id: "python/os-system",
        language: Some(Language::Python),
        pattern: r"os\.system\s*\(",
        message: "os.system() is vulnerable to command injection",
        severity: "security",
    },
    // JavaScript
    RuleSpec {
        id: "javascript/var-keyword",
        language: Some(Language::JavaScript),
        pattern: r"\bvar\s+",
        message: "Use let/const instead of var",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/eval-call",
        language: Some(Language::JavaScript),
        pattern: r"eval\s*\(",
        message: "Use of eval() is a security risk",
        severity: "security",
    },
    RuleSpec {
        id: "javascript/inner-html",
        language: Some(Language::JavaScript),
        pattern: r"innerHTML\s*=",
        message: "innerHTML can lead to XSS vulnerabilities",
        severity: "security",
    },
    RuleSpec {
        id: "javascript/document-write",
        language: Some(Language::JavaScript),
        pattern: r"document\.write\s*\(",
        message: "document.write() is deprecated",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/loose-null-equality",
        language: Some(Language::JavaScript),
        pattern: r"==\s*null|null\s*==",
        message: "Use === for strict equality",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/loose-null-inequality",
        language: Some(Language::JavaScript),
        pattern: r"!=\s*null|null\s*!=",
        message: "Use !== for strict inequality",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/console-log",
        language: Some(Language::JavaScript),
        pattern: r"console\.log\s*\(",
        message: "Console log statement (debug)",
        severity: "info",
    },
    RuleSpec {
        id: "javascript/debugger-statement",
        language: Some(Language::JavaScript),
        pattern: r"debugger",
        message: "Debugger statement found",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/alert-call",
        language: Some(Language::JavaScript),
        pattern: r"alert\s*\(",
        message: "Alert statement (debug/bad UX)",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/promise-chain",
        language: Some(Language::JavaScript),
        pattern: r"\.then\s*\(.*\.then\s*\(",
        message: "Promise chain - consider async/await",
        severity: "suggestion",
    },
    RuleSpec {
        id: "javascript/nested-callbacks",
        language: Some(Language::JavaScript),
        pattern: r"callback.*callback",
        message: "Nested callbacks - consider async/await",
        severity: "warning",
    },
    RuleSpec {
        id: "javascript/new-function",
        language: Some(Language::JavaScript),
        pattern: r"new\s+Function\s*\(",
        message: "Dynamic function creation is risky",
        severity: "security",
    },
    RuleSpec {
        id: "javascript/string-settimeout",
        language: Some(Language::JavaScript),
        pattern: r#"setTimeout\s*\(['"]"#,
        message: "String in setTimeout is like eval",
        severity: "security",
    },
    // Java
    RuleSpec {
        id: "java/broad-catch",
        language: Some(Language::Java),
        pattern: r"catch\s*\(\s*Exception\s+",
        message: "Catching generic Exception",
        severity: "warning",
    },
    RuleSpec {
        id: "java/catch-throwable",
        language: Some(Language::Java),
        pattern: r"catch\s*\(\s*Throwable\s+",
        message: "Catching Throwable is too broad",
        severity: "error",
    },
    RuleSpec {
        id: "java/print-stack-trace",
        language: Some(Language::Java),
        pattern: r"e\.printStackTrace\s*\(\s*\)",
        message: "printStackTrace() in production code",
        severity: "warning",
    },
    RuleSpec {
        id: "java/system-out",
        language: Some(Language::Java),
        pattern: r"System\.out\.print",
        message: "System.out usage (use logger)",
        severity: "warning",
    },
    RuleSpec {
        id: "java/public-field",
        language: Some(Language::Java),
        pattern: r"public\s+\w+\s+\w+\s*;",
        message: "Public field without getter/setter",
        severity: "warning",
    },
    RuleSpec {
        id: "java/new-string",
        language: Some(Language::Java),
        pattern: r#"new\s+String\s*\(\s*['"]"#,
        message: "Unnecessary String object creation",
        severity: "suggestion",
    },
    RuleSpec {
        id: "java/string-ref-equality",
        language: Some(Language::Java),
        pattern: r#"==\s*"|"\s*=="#,
        message: "String comparison with == instead of equals()",
        severity: "error",
    },
    RuleSpec {
        id: "java/equals-null",
        language: Some(Language::Java),
        pattern: r"\.equals\s*\(\s*null\s*\)",
        message: "null.equals() will throw NPE",
        severity: "error",
    },
    RuleSpec {
        id: "java/sync-on-this",
        language: Some(Language::Java),
        pattern: r"synchronized\s*\(\s*this\s*\)",
        message: "Synchronizing on 'this' is risky",
        severity: "warning",
    },
    RuleSpec {
        id: "java/thread-sleep",
        language: Some(Language::Java),
        pattern: r"Thread\.sleep\s*\(",
        message: "Thread.sleep() in production code",
        severity: "warning",
    },
    RuleSpec {
        id: "java/todo-comment",
        language: Some(Language::Java),
        pattern: r"//\s*TODO",
        message: "TODO comment found",
        severity: "info",
    },
    RuleSpec {
        id: "java/fixme-comment",
        language: Some(Language::Java),
        pattern: r"//\s*FIXME",
        message: "FIXME comment found",
        severity: "warning",
    },
    // Language-agnostic
    RuleSpec {
        id: "general/password-handling",
        language: None,
        pattern: r"password|passwd|pwd",
        message: "Potential password handling",
        severity: "security",
    },
    RuleSpec {
        id: "general/secret-handling",
        language: None,
        pattern: r"secret|api[_-]?key|token",
        message: "Potential secret/token handling",
        severity: "security",
    },
    RuleSpec {
        id: "general/unfinished-marker",
        language: None,
        pattern: r"TODO|FIXME|HACK|XXX",
        message: "Unfinished code marker",
        severity: "warning",
    },
    RuleSpec {
        id: "general/magic-suffix",
        language: None,
        pattern: r"[A-Za-z]+\d{3,}",
        message: "Magic number in identifier",
        severity: "info",
    },
];
