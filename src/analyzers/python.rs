//! Python structural extraction over a real grammar (tree-sitter).
//!
//! Imports are collected from the whole tree; functions, classes and global
//! assignments only from module level, with class bodies contributing
//! methods and annotated attributes. Complexity is a deterministic count
//! over the full tree, not per-function.

use crate::complexity;
use crate::core::{
    AttributeEntity, ClassEntity, FunctionEntity, GlobalVariable, Language, Parameter, ParseResult,
};
use tree_sitter::{Node, Parser};

pub fn parse(code: &str) -> ParseResult {
    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
        log::error!("failed to load Python grammar: {err}");
        let mut result = ParseResult::empty(Language::Python, 0.0);
        result.errors.push(format!("Parse error: {err}"));
        return result;
    }

    let Some(tree) = parser.parse(code, None) else {
        let mut result = ParseResult::empty(Language::Python, 0.0);
        result
            .errors
            .push("Parse error: parser produced no tree".to_string());
        return result;
    };

    let root = tree.root_node();
    if root.has_error() {
        // Degrade, don't propagate: empty structural model, zero complexity.
        let (line, message) =
            find_syntax_error(root).unwrap_or((1, "invalid syntax".to_string()));
        let mut result = ParseResult::empty(Language::Python, 0.0);
        result
            .errors
            .push(format!("Syntax error at line {line}: {message}"));
        return result;
    }

    let lines: Vec<&str> = code.split('\n').collect();

    let mut imports = Vec::new();
    collect_imports(root, code, &mut imports);

    let mut functions = Vec::new();
    let mut classes = Vec::new();
    let mut globals = Vec::new();

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "function_definition" => {
                functions.push(extract_function(node, code, &lines, Vec::new(), None));
            }
            "class_definition" => {
                classes.push(extract_class(node, code, &lines, Vec::new()));
            }
            "decorated_definition" => {
                let decorators = decorator_texts(node, code);
                if let Some(def) = node.child_by_field_name("definition") {
                    match def.kind() {
                        "function_definition" => {
                            functions.push(extract_function(def, code, &lines, decorators, None));
                        }
                        "class_definition" => {
                            classes.push(extract_class(def, code, &lines, decorators));
                        }
                        _ => {}
                    }
                }
            }
            "expression_statement" => collect_globals(node, code, &mut globals),
            _ => {}
        }
    }

    let raw_complexity = 1 + count_branches(root);

    ParseResult {
        language: Language::Python,
        functions,
        classes,
        imports,
        global_variables: globals,
        errors: Vec::new(),
        complexity_score: complexity::scale_tree_count(raw_complexity),
    }
}

fn node_text<'a>(node: Node<'_>, code: &'a str) -> &'a str {
    node.utf8_text(code.as_bytes()).unwrap_or("")
}

/// First ERROR or missing node in document order.
fn find_syntax_error(node: Node<'_>) -> Option<(usize, String)> {
    if node.is_error() {
        return Some((node.start_position().row + 1, "invalid syntax".to_string()));
    }
    if node.is_missing() {
        return Some((
            node.start_position().row + 1,
            format!("missing {}", node.kind()),
        ));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_syntax_error(child) {
            return Some(found);
        }
    }
    None
}

/// Branch constructs counted toward the complexity score. Each `elif` arm
/// counts like its own conditional; each binary boolean combination adds
/// one, so a chain of N operands contributes N-1.
fn count_branches(node: Node<'_>) -> u32 {
    let own = match node.kind() {
        "if_statement" | "elif_clause" | "while_statement" | "for_statement" | "except_clause"
        | "boolean_operator" => 1,
        _ => 0,
    };

    let mut cursor = node.walk();
    let children: u32 = node.children(&mut cursor).map(count_branches).sum();
    own + children
}

fn collect_imports(node: Node<'_>, code: &str, imports: &mut Vec<String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "dotted_name" => imports.push(node_text(child, code).to_string()),
                    "aliased_import" => {
                        if let Some(name) = child.child_by_field_name("name") {
                            imports.push(node_text(name, code).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            let module = node
                .child_by_field_name("module_name")
                .map(|m| node_text(m, code).to_string())
                .unwrap_or_default();

            let mut cursor = node.walk();
            let mut named_any = false;
            for name in node.children_by_field_name("name", &mut cursor) {
                let imported = match name.kind() {
                    "aliased_import" => name
                        .child_by_field_name("name")
                        .map(|n| node_text(n, code).to_string())
                        .unwrap_or_default(),
                    _ => node_text(name, code).to_string(),
                };
                imports.push(format!("{module}.{imported}"));
                named_any = true;
            }

            if !named_any {
                let mut cursor = node.walk();
                if node
                    .named_children(&mut cursor)
                    .any(|child| child.kind() == "wildcard_import")
                {
                    imports.push(format!("{module}.*"));
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_imports(child, code, imports);
            }
        }
    }
}

fn extract_function(
    node: Node<'_>,
    code: &str,
    lines: &[&str],
    decorators: Vec<String>,
    class_name: Option<&str>,
) -> FunctionEntity {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, code).to_string())
        .unwrap_or_default();
    let start_line = node.start_position().row + 1;
    let end_line = node.end_position().row + 1;
    let is_async = node.child(0).map(|c| c.kind() == "async").unwrap_or(false);

    let mut parameters = Vec::new();
    if let Some(params_node) = node.child_by_field_name("parameters") {
        let mut cursor = params_node.walk();
        for param in params_node.named_children(&mut cursor) {
            match param.kind() {
                "identifier" => parameters.push(Parameter {
                    name: node_text(param, code).to_string(),
                    declared_type: None,
                    default_literal: None,
                }),
                "typed_parameter" => parameters.push(Parameter {
                    name: param
                        .named_child(0)
                        .map(|n| node_text(n, code).to_string())
                        .unwrap_or_default(),
                    declared_type: param
                        .child_by_field_name("type")
                        .map(|t| node_text(t, code).to_string()),
                    default_literal: None,
                }),
                "default_parameter" => parameters.push(Parameter {
                    name: param
                        .child_by_field_name("name")
                        .map(|n| node_text(n, code).to_string())
                        .unwrap_or_default(),
                    declared_type: None,
                    default_literal: param
                        .child_by_field_name("value")
                        .map(|v| node_text(v, code).to_string()),
                }),
                "typed_default_parameter" => parameters.push(Parameter {
                    name: param
                        .child_by_field_name("name")
                        .map(|n| node_text(n, code).to_string())
                        .unwrap_or_default(),
                    declared_type: param
                        .child_by_field_name("type")
                        .map(|t| node_text(t, code).to_string()),
                    default_literal: param
                        .child_by_field_name("value")
                        .map(|v| node_text(v, code).to_string()),
                }),
                // *args / **kwargs / bare separators are not reported
                _ => {}
            }
        }
    }

    let return_type = node
        .child_by_field_name("return_type")
        .map(|t| node_text(t, code).to_string());
    let docstring = node
        .child_by_field_name("body")
        .and_then(|body| extract_docstring(body, code));

    FunctionEntity {
        signature: render_signature(&name, &parameters, return_type.as_deref()),
        name,
        start_line,
        end_line,
        parameters,
        return_type,
        body: slice_lines(lines, start_line, end_line),
        decorators,
        docstring,
        is_async,
        is_method: class_name.is_some(),
        class_name: class_name.map(str::to_string),
    }
}

fn extract_class(
    node: Node<'_>,
    code: &str,
    lines: &[&str],
    decorators: Vec<String>,
) -> ClassEntity {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, code).to_string())
        .unwrap_or_default();
    let start_line = node.start_position().row + 1;
    let end_line = node.end_position().row + 1;

    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| {
            let mut cursor = args.walk();
            args.named_children(&mut cursor)
                .filter(|c| c.kind() != "keyword_argument" && c.kind() != "comment")
                .map(|c| node_text(c, code).to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut methods = Vec::new();
    let mut attributes = Vec::new();
    let mut docstring = None;

    if let Some(body) = node.child_by_field_name("body") {
        docstring = extract_docstring(body, code);

        let mut cursor = body.walk();
        for item in body.named_children(&mut cursor) {
            match item.kind() {
                "function_definition" => {
                    methods.push(extract_function(
                        item,
                        code,
                        lines,
                        Vec::new(),
                        Some(name.as_str()),
                    ));
                }
                "decorated_definition" => {
                    if let Some(def) = item.child_by_field_name("definition") {
                        if def.kind() == "function_definition" {
                            methods.push(extract_function(
                                def,
                                code,
                                lines,
                                decorator_texts(item, code),
                                Some(name.as_str()),
                            ));
                        }
                    }
                }
                "expression_statement" => {
                    if let Some(attribute) = annotated_attribute(item, code) {
                        attributes.push(attribute);
                    }
                }
                _ => {}
            }
        }
    }

    ClassEntity {
        name,
        start_line,
        end_line,
        bases,
        methods,
        attributes,
        docstring,
        decorators,
    }
}

/// Decorator expressions above a definition, rendered without the `@`.
fn decorator_texts(node: Node<'_>, code: &str) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .map(|c| node_text(c, code).trim_start_matches('@').trim().to_string())
        .collect()
}

/// Leading string expression of a block, if any.
fn extract_docstring(body: Node<'_>, code: &str) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }

    let mut cursor = expr.walk();
    let content: String = expr
        .children(&mut cursor)
        .filter(|c| c.kind() == "string_content")
        .map(|c| node_text(c, code))
        .collect();
    Some(content.trim().to_string())
}

/// Class-body `name: type` / `name: type = value` declarations.
fn annotated_attribute(stmt: Node<'_>, code: &str) -> Option<AttributeEntity> {
    let assign = stmt.named_child(0)?;
    if assign.kind() != "assignment" {
        return None;
    }
    let type_node = assign.child_by_field_name("type")?;
    let left = assign.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }

    Some(AttributeEntity {
        name: node_text(left, code).to_string(),
        declared_type: Some(node_text(type_node, code).to_string()),
        line: assign.start_position().row + 1,
    })
}

/// Module-level plain assignments to simple names. Annotated assignments
/// are not globals (they match the class-attribute shape instead), and
/// chained targets all record the final right-hand side.
fn collect_globals(stmt: Node<'_>, code: &str, globals: &mut Vec<GlobalVariable>) {
    let Some(first) = stmt.named_child(0) else {
        return;
    };
    if first.kind() != "assignment" || first.child_by_field_name("type").is_some() {
        return;
    }

    let mut assign = first;
    let mut targets: Vec<(String, usize)> = Vec::new();
    loop {
        if let Some(left) = assign.child_by_field_name("left") {
            if left.kind() == "identifier" {
                targets.push((
                    node_text(left, code).to_string(),
                    assign.start_position().row + 1,
                ));
            }
        }

        match assign.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" => assign = right,
            Some(right) => {
                let value = node_text(right, code).to_string();
                for (name, line) in targets {
                    globals.push(GlobalVariable {
                        name,
                        line,
                        value_repr: value.clone(),
                    });
                }
                return;
            }
            None => return,
        }
    }
}

fn render_signature(name: &str, parameters: &[Parameter], return_type: Option<&str>) -> String {
    let rendered: Vec<String> = parameters
        .iter()
        .map(|p| {
            let mut part = p.name.clone();
            if let Some(declared) = &p.declared_type {
                part.push_str(": ");
                part.push_str(declared);
            }
            if let Some(default) = &p.default_literal {
                part.push_str(" = ");
                part.push_str(default);
            }
            part
        })
        .collect();

    let mut signature = format!("def {}({})", name, rendered.join(", "));
    if let Some(ret) = return_type {
        signature.push_str(" -> ");
        signature.push_str(ret);
    }
    signature
}

fn slice_lines(lines: &[&str], start_line: usize, end_line: usize) -> String {
    let end = end_line.min(lines.len());
    if start_line == 0 || start_line > end {
        return String::new();
    }
    lines[start_line - 1..end].join("\n")
}
