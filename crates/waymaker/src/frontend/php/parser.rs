//! PHP parser using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{GeneratorError, Span};
use super::ast::*;

/// PHP parser.
pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    /// Creates a new PHP parser.
    pub fn new() -> Result<Self, GeneratorError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|_| GeneratorError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a PHP source file.
    ///
    /// Syntax errors do not fail the parse; tree-sitter recovers and the
    /// result is flagged with `has_errors`.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedFile, GeneratorError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GeneratorError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        let mut visitor = Visitor::new(source, path);
        visitor.visit_statements(root);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            imports: visitor.imports,
            classes: visitor.classes,
            has_errors: root.has_error(),
        })
    }
}

/// AST visitor that extracts declarations from tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    namespace: Option<String>,
    imports: Vec<UseImport>,
    classes: Vec<ClassDecl>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            namespace: None,
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(
            self.path.to_path_buf(),
            node.start_position().row + 1,
            node.start_position().column + 1,
            node.end_position().row + 1,
            node.end_position().column + 1,
        )
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Visits top-level statements, or the body of a braced namespace.
    fn visit_statements(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "namespace_definition" => self.visit_namespace(child),
                "namespace_use_declaration" => {
                    let imports = parse_use_declaration(self.node_text(child));
                    self.imports.extend(imports);
                }
                "class_declaration" => {
                    if let Some(class) = self.visit_class(child) {
                        self.classes.push(class);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_namespace(&mut self, node: Node) {
        let name = node
            .child_by_field_name("name")
            .or_else(|| find_child(node, "namespace_name"))
            .map(|n| self.node_text(n).trim_matches('\\').to_string())
            .filter(|n| !n.is_empty());

        let body = node
            .child_by_field_name("body")
            .or_else(|| find_child(node, "compound_statement"));

        match body {
            // namespace Foo { ... }
            Some(body) => {
                let outer = std::mem::replace(&mut self.namespace, name);
                self.visit_statements(body);
                self.namespace = outer;
            }
            // namespace Foo;
            None => self.namespace = name,
        }
    }

    fn visit_class(&mut self, node: Node) -> Option<ClassDecl> {
        let name = node
            .child_by_field_name("name")
            .or_else(|| find_child(node, "name"))
            .map(|n| self.node_text(n).to_string())?;

        let mut parent = None;
        let mut is_abstract = false;
        let mut properties = Vec::new();
        let mut methods = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "abstract_modifier" => is_abstract = true,
                "class_modifier" if self.node_text(child) == "abstract" => is_abstract = true,
                "base_clause" => parent = self.visit_base_clause(child),
                "declaration_list" => {
                    let (props, meths) = self.visit_declaration_list(child);
                    properties = props;
                    methods = meths;
                }
                _ => {}
            }
        }

        Some(ClassDecl {
            name,
            namespace: self.namespace.clone(),
            parent,
            is_abstract,
            properties,
            methods,
            span: self.span(node),
        })
    }

    fn visit_base_clause(&self, node: Node) -> Option<String> {
        let mut cursor = node.walk();
        let named = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "name" | "qualified_name"))
            .map(|c| self.node_text(c).to_string());

        named.or_else(|| {
            self.node_text(node)
                .trim()
                .strip_prefix("extends")
                .map(|rest| rest.trim().to_string())
                .filter(|rest| !rest.is_empty())
        })
    }

    fn visit_declaration_list(&self, node: Node) -> (Vec<PropertyDecl>, Vec<MethodDecl>) {
        let mut properties = Vec::new();
        let mut methods = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "property_declaration" => properties.extend(self.visit_property_declaration(child)),
                "method_declaration" => {
                    if let Some(method) = self.visit_method(child) {
                        methods.push(method);
                    }
                }
                _ => {}
            }
        }

        (properties, methods)
    }

    fn visit_property_declaration(&self, node: Node) -> Vec<PropertyDecl> {
        let mut is_static = false;
        let mut elements = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static_modifier" => is_static = true,
                "property_element" => elements.push(child),
                _ => {}
            }
        }

        elements
            .into_iter()
            .filter_map(|element| {
                let variable = find_child(element, "variable_name")?;
                let name = self.node_text(variable).trim_start_matches('$').to_string();
                Some(PropertyDecl {
                    name,
                    is_static,
                    value: self.property_value(element),
                    span: self.span(element),
                })
            })
            .collect()
    }

    /// Initializer of a `property_element`, across grammar revisions.
    fn property_value(&self, element: Node) -> Option<PhpValue> {
        if let Some(value) = element.child_by_field_name("default_value") {
            return Some(self.visit_value(value));
        }
        if let Some(init) = find_child(element, "property_initializer") {
            return last_named_child(init).map(|v| self.visit_value(v));
        }

        let mut seen_eq = false;
        let mut cursor = element.walk();
        for child in element.children(&mut cursor) {
            if child.kind() == "=" {
                seen_eq = true;
            } else if seen_eq && child.is_named() {
                return Some(self.visit_value(child));
            }
        }
        None
    }

    fn visit_method(&self, node: Node) -> Option<MethodDecl> {
        let name = node
            .child_by_field_name("name")
            .or_else(|| find_child(node, "name"))
            .map(|n| self.node_text(n).to_string())?;

        let mut visibility = Visibility::Public;
        let mut is_static = false;
        let mut attributes = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "visibility_modifier" => {
                    visibility = match self.node_text(child).to_ascii_lowercase().as_str() {
                        "private" => Visibility::Private,
                        "protected" => Visibility::Protected,
                        _ => Visibility::Public,
                    };
                }
                "static_modifier" => is_static = true,
                "attribute_list" => attributes.extend(self.visit_attribute_list(child)),
                _ => {}
            }
        }

        Some(MethodDecl {
            name,
            visibility,
            is_static,
            attributes,
            span: self.span(node),
        })
    }

    fn visit_attribute_list(&self, node: Node) -> Vec<AttributeDecl> {
        let mut attributes = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "attribute_group" => {
                    let mut group_cursor = child.walk();
                    for attr in child.named_children(&mut group_cursor) {
                        if attr.kind() == "attribute" {
                            attributes.extend(self.visit_attribute(attr));
                        }
                    }
                }
                "attribute" => attributes.extend(self.visit_attribute(child)),
                _ => {}
            }
        }

        attributes
    }

    fn visit_attribute(&self, node: Node) -> Option<AttributeDecl> {
        let mut name = None;
        let mut arguments = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "name" | "qualified_name" if name.is_none() => {
                    name = Some(self.node_text(child).to_string());
                }
                "arguments" => arguments = self.visit_arguments(child),
                _ => {}
            }
        }

        Some(AttributeDecl {
            name: name?,
            arguments,
            span: self.span(node),
        })
    }

    fn visit_arguments(&self, node: Node) -> Vec<AttributeArgument> {
        let mut arguments = Vec::new();

        let mut cursor = node.walk();
        for arg in node.named_children(&mut cursor) {
            if arg.kind() != "argument" {
                continue;
            }

            // In `name: value` the name is the named node before the `:` token.
            let mut arg_name = None;
            let mut last_named: Option<Node> = None;
            let mut arg_cursor = arg.walk();
            for child in arg.children(&mut arg_cursor) {
                if child.kind() == ":" {
                    arg_name = last_named
                        .filter(|n| n.kind() == "name")
                        .map(|n| self.node_text(n).to_string());
                }
                if child.is_named() {
                    last_named = Some(child);
                }
            }

            if let Some(value) = last_named {
                arguments.push(AttributeArgument {
                    name: arg_name,
                    value: self.visit_value(value),
                });
            }
        }

        arguments
    }

    fn visit_value(&self, node: Node) -> PhpValue {
        let text = self.node_text(node);
        match node.kind() {
            "null" => PhpValue::Null,
            "boolean" => PhpValue::Bool(text.eq_ignore_ascii_case("true")),
            "integer" => text
                .replace('_', "")
                .parse()
                .map(PhpValue::Int)
                .unwrap_or_else(|_| PhpValue::Expr(text.to_string())),
            "string" | "encapsed_string" => PhpValue::String(unquote(text)),
            "array_creation_expression" => {
                let mut items = Vec::new();
                let mut cursor = node.walk();
                for element in node.named_children(&mut cursor) {
                    if element.kind() == "array_element_initializer" {
                        if let Some(value) = last_named_child(element) {
                            items.push(self.visit_value(value));
                        }
                    }
                }
                PhpValue::Array(items)
            }
            "parenthesized_expression" => match last_named_child(node) {
                Some(inner) => self.visit_value(inner),
                None => PhpValue::Expr(text.to_string()),
            },
            "name" if text.eq_ignore_ascii_case("null") => PhpValue::Null,
            "name" if text.eq_ignore_ascii_case("true") => PhpValue::Bool(true),
            "name" if text.eq_ignore_ascii_case("false") => PhpValue::Bool(false),
            _ => PhpValue::Expr(text.to_string()),
        }
    }
}

fn find_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn last_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let count = node.named_child_count();
    if count == 0 {
        None
    } else {
        node.named_child(count - 1)
    }
}

/// Parses the text of a `use` declaration into class imports.
///
/// Handles aliases and group syntax. Function and constant imports are
/// ignored.
pub fn parse_use_declaration(text: &str) -> Vec<UseImport> {
    let body = text
        .trim()
        .trim_end_matches(';')
        .trim();
    let body = match body.get(..3) {
        Some(kw) if kw.eq_ignore_ascii_case("use") => body[3..].trim(),
        _ => body,
    };
    if is_non_class_import(body) {
        return Vec::new();
    }

    match (body.find('{'), body.rfind('}')) {
        // use Foo\{Bar, Baz as Qux};
        (Some(open), Some(close)) if open < close => {
            let prefix = body[..open].trim().trim_end_matches('\\');
            body[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty() && !is_non_class_import(item))
                .filter_map(|item| parse_use_clause(&format!("{}\\{}", prefix, item)))
                .collect()
        }
        _ => body.split(',').filter_map(parse_use_clause).collect(),
    }
}

fn is_non_class_import(s: &str) -> bool {
    let first = s.split_whitespace().next().unwrap_or("");
    first.eq_ignore_ascii_case("function") || first.eq_ignore_ascii_case("const")
}

fn parse_use_clause(clause: &str) -> Option<UseImport> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    let name = tokens.first()?.trim_start_matches('\\');
    if name.is_empty() {
        return None;
    }

    let alias = match tokens.as_slice() {
        [_, kw, alias, ..] if kw.eq_ignore_ascii_case("as") => alias.to_string(),
        _ => name.rsplit('\\').next().unwrap_or(name).to_string(),
    };

    Some(UseImport {
        name: name.to_string(),
        alias,
    })
}

/// Strips quotes from a PHP string literal and resolves escape sequences.
pub fn unquote(text: &str) -> String {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        let inner = &text[1..text.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(&next) = chars.peek() {
                    if next == '\'' || next == '\\' {
                        out.push(next);
                        chars.next();
                        continue;
                    }
                }
            }
            out.push(c);
        }
        out
    } else if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        let inner = &text[1..text.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('$') => out.push('$'),
                _ => {
                    out.push('\\');
                    continue;
                }
            }
            chars.next();
        }
        out
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = PhpParser::new().unwrap();
        parser.parse(source, Path::new("TestController.php")).unwrap()
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'users'"), "users");
        assert_eq!(unquote(r"'it\'s'"), "it's");
        assert_eq!(unquote(r"'a\b'"), r"a\b");
        assert_eq!(unquote(r#""say \"hi\"\n""#), "say \"hi\"\n");
    }

    #[test]
    fn test_parse_use_declaration() {
        assert_eq!(
            parse_use_declaration("use HardImpact\\Waymaker\\Get;"),
            vec![UseImport {
                name: "HardImpact\\Waymaker\\Get".to_string(),
                alias: "Get".to_string(),
            }]
        );
        assert_eq!(
            parse_use_declaration("use \\HardImpact\\Waymaker\\Post as RoutePost, Foo\\Bar;"),
            vec![
                UseImport {
                    name: "HardImpact\\Waymaker\\Post".to_string(),
                    alias: "RoutePost".to_string(),
                },
                UseImport {
                    name: "Foo\\Bar".to_string(),
                    alias: "Bar".to_string(),
                },
            ]
        );
        let grouped = parse_use_declaration("use HardImpact\\Waymaker\\{Get, Delete as Remove};");
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[1].name, "HardImpact\\Waymaker\\Delete");
        assert_eq!(grouped[1].alias, "Remove");
        assert!(parse_use_declaration("use function Foo\\bar;").is_empty());
    }

    #[test]
    fn parses_namespace_class_and_attributes() {
        let file = parse(
            r#"<?php

namespace App\Http\Controllers;

use HardImpact\Waymaker\Get;
use HardImpact\Waymaker\Post;

class PhotoController extends Controller
{
    protected static string $routePrefix = 'photos';
    protected static array $routeMiddleware = ['auth', 'verified'];
    private $helper;

    #[Get]
    public function index() {}

    #[Get(uri: '{photo}', name: 'photos.show', middleware: 'can:view')]
    public function show() {}

    #[Post('upload', null, [], ['throttle:10,1'])]
    public function store() {}

    protected function internal() {}
}
"#,
        );

        assert!(!file.has_errors);
        assert_eq!(file.imports.len(), 2);
        let class = file.find_class("App\\Http\\Controllers\\PhotoController").unwrap();
        assert_eq!(class.parent.as_deref(), Some("Controller"));
        assert!(!class.is_abstract);

        let prefix = class.static_property("routePrefix").unwrap();
        assert_eq!(prefix.value, Some(PhpValue::String("photos".to_string())));
        let middleware = class.static_property("routeMiddleware").unwrap();
        assert_eq!(
            middleware.value,
            Some(PhpValue::Array(vec![
                PhpValue::String("auth".to_string()),
                PhpValue::String("verified".to_string()),
            ]))
        );
        assert!(class.static_property("helper").is_none());

        assert_eq!(class.methods.len(), 4);
        assert_eq!(class.methods[0].attributes[0].name, "Get");
        assert!(class.methods[0].attributes[0].arguments.is_empty());

        let show = &class.methods[1].attributes[0].arguments;
        assert_eq!(show[0].name.as_deref(), Some("uri"));
        assert_eq!(show[0].value, PhpValue::String("{photo}".to_string()));
        assert_eq!(show[2].name.as_deref(), Some("middleware"));

        let store = &class.methods[2].attributes[0].arguments;
        assert_eq!(store.len(), 4);
        assert!(store.iter().all(|a| a.name.is_none()));
        assert_eq!(store[1].value, PhpValue::Null);
        assert_eq!(store[2].value, PhpValue::Array(Vec::new()));

        assert_eq!(class.methods[3].visibility, Visibility::Protected);
        assert_eq!(class.methods[0].span.start_line, 14);
    }

    #[test]
    fn braced_namespaces_scope_classes() {
        let file = parse(
            r#"<?php
namespace App\Http\Controllers\Admin {
    abstract class BaseController {}
}
"#,
        );
        let class = file.find_class("App\\Http\\Controllers\\Admin\\BaseController").unwrap();
        assert!(class.is_abstract);
    }

    #[test]
    fn syntax_errors_are_flagged() {
        let file = parse("<?php\nclass BrokenController {\n public function index( {}\n");
        assert!(file.has_errors);
    }
}
