//! Controller intermediate representation.
//!
//! Produced by a frontend from controller source; consumed read-only by the
//! method scanner.

use std::path::PathBuf;

use super::HttpVerb;
use crate::diagnostic::Span;

/// Middleware as written on a route declaration: one entry or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiddlewareSpec {
    Single(String),
    List(Vec<String>),
}

impl MiddlewareSpec {
    /// Flattens the declaration into an ordered list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            MiddlewareSpec::Single(name) => vec![name.clone()],
            MiddlewareSpec::List(names) => names.clone(),
        }
    }
}

/// Routing metadata attached to a single controller method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
    pub verb: HttpVerb,
    /// Explicit URI override.
    pub uri: Option<String>,
    /// Explicit route name override.
    pub name: Option<String>,
    /// Route parameter names, appended as `{name}` segments.
    pub parameters: Option<Vec<String>>,
    pub middleware: Option<MiddlewareSpec>,
}

impl RouteDeclaration {
    /// A declaration with no overrides.
    pub fn new(verb: HttpVerb) -> Self {
        Self {
            verb,
            uri: None,
            name: None,
            parameters: None,
            middleware: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = Some(parameters.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_middleware(mut self, middleware: MiddlewareSpec) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Route-specific middleware as an ordered list (empty when none declared).
    pub fn middleware_list(&self) -> Vec<String> {
        self.middleware
            .as_ref()
            .map(MiddlewareSpec::to_list)
            .unwrap_or_default()
    }
}

/// A public method declared directly on a controller class.
#[derive(Debug, Clone)]
pub struct MethodIR {
    pub name: String,
    /// The first recognised route declaration, if any.
    pub declaration: Option<RouteDeclaration>,
    pub span: Option<Span>,
}

impl MethodIR {
    pub fn new(name: impl Into<String>, declaration: Option<RouteDeclaration>) -> Self {
        Self {
            name: name.into(),
            declaration,
            span: None,
        }
    }
}

/// IR representation of a controller class.
#[derive(Debug, Clone)]
pub struct ControllerIR {
    /// Fully qualified class name without a leading backslash.
    pub class_name: String,

    /// Source file path.
    pub source_path: PathBuf,

    /// Value of `static $routePrefix`, if declared or inherited.
    pub route_prefix: Option<String>,

    /// Value of `static $routeMiddleware`, normalised to a list.
    pub route_middleware: Vec<String>,

    /// Public methods declared on the class itself, in declaration order.
    pub methods: Vec<MethodIR>,
}

impl ControllerIR {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            source_path: PathBuf::new(),
            route_prefix: None,
            route_middleware: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Unqualified class name (`UserController` for `App\Http\Controllers\UserController`).
    pub fn short_name(&self) -> &str {
        self.class_name
            .rsplit('\\')
            .next()
            .unwrap_or(&self.class_name)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    pub fn with_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_method(mut self, method: MethodIR) -> Self {
        self.methods.push(method);
        self
    }
}
