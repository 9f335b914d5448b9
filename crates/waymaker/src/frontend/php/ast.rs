//! PHP-specific AST types.
//!
//! Only the parts of a PHP file that carry routing metadata are modelled:
//! namespaces, `use` imports, classes, their static properties and the
//! attributes on their methods.

use std::path::PathBuf;
use crate::diagnostic::Span;

/// A parsed PHP file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub imports: Vec<UseImport>,
    pub classes: Vec<ClassDecl>,
    /// Whether tree-sitter reported syntax errors.
    pub has_errors: bool,
}

impl ParsedFile {
    /// The class whose fully qualified name matches `fqcn` (case-insensitive).
    pub fn find_class(&self, fqcn: &str) -> Option<&ClassDecl> {
        let fqcn = fqcn.trim_start_matches('\\');
        self.classes
            .iter()
            .find(|class| class.qualified_name().eq_ignore_ascii_case(fqcn))
    }
}

/// A class import: `use Foo\Bar as Baz;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseImport {
    /// Fully qualified name without a leading backslash.
    pub name: String,
    /// Local alias; the last name segment when no `as` is given.
    pub alias: String,
}

/// A class declaration.
#[derive(Debug)]
pub struct ClassDecl {
    pub name: String,
    /// Enclosing namespace, without surrounding backslashes.
    pub namespace: Option<String>,
    /// Parent class as written after `extends`.
    pub parent: Option<String>,
    pub is_abstract: bool,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

impl ClassDecl {
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// A static property declared on this class (not inherited).
    pub fn static_property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties
            .iter()
            .find(|prop| prop.is_static && prop.name == name)
    }
}

/// A class property declaration.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    /// Name without the leading `$`.
    pub name: String,
    pub is_static: bool,
    /// Initial value; `None` when the property has no initializer.
    pub value: Option<PhpValue>,
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Attributes in source order, across all `#[...]` groups.
    pub attributes: Vec<AttributeDecl>,
    pub span: Span,
}

/// Method visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// One attribute inside an `#[...]` group.
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute class name as written (`Get`, `\HardImpact\Waymaker\Get`).
    pub name: String,
    pub arguments: Vec<AttributeArgument>,
    pub span: Span,
}

/// A positional or named attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArgument {
    pub name: Option<String>,
    pub value: PhpValue,
}

/// Constant-expression values that can appear in attributes and property
/// initializers.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// Array values in order. Keys are dropped.
    Array(Vec<PhpValue>),
    /// Anything else, kept as source text.
    Expr(String),
}

impl PhpValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short description used in warnings.
    pub fn kind(&self) -> &'static str {
        match self {
            PhpValue::Null => "null",
            PhpValue::Bool(_) => "bool",
            PhpValue::Int(_) => "int",
            PhpValue::String(_) => "string",
            PhpValue::Array(_) => "array",
            PhpValue::Expr(_) => "expression",
        }
    }
}
