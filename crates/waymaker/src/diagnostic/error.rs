//! Generator error types.
#![allow(unused_assignments)]

use std::fmt;
use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// The controller method that claimed a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLocation {
    /// Fully qualified controller class name.
    pub class: String,
    /// Method name on the controller.
    pub method: String,
    /// Where the method is declared, when known.
    pub span: Option<Span>,
}

impl RouteLocation {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }
}

impl fmt::Display for RouteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

/// Errors that can occur during route generation.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(waymaker::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration in '{}': {message}", path.display())]
    #[diagnostic(
        code(waymaker::config::invalid),
        help("Known keys: controllers, namespace, attribute_namespace, output, environment, language, [cache], [method_defaults]")
    )]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(waymaker::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(waymaker::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Route Errors
    // =========================================================================
    #[error("Duplicate route detected: {verb} {uri}\nFirst defined in: {first}\nDuplicate found in: {duplicate}")]
    #[diagnostic(code(waymaker::routes::duplicate))]
    DuplicateRoute {
        verb: String,
        uri: String,
        first: RouteLocation,
        duplicate: RouteLocation,
        #[help]
        help: String,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported language: {language}")]
    #[diagnostic(code(waymaker::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate route error. The help names the source position
    /// of each method whose span is known.
    pub fn duplicate_route(
        verb: impl Into<String>,
        uri: impl Into<String>,
        first: RouteLocation,
        duplicate: RouteLocation,
    ) -> Self {
        let sites: Vec<String> = [("first", &first), ("duplicate", &duplicate)]
            .into_iter()
            .filter_map(|(label, location)| location.span.as_ref().map(|span| format!("{} at {}", label, span)))
            .collect();
        let mut help = String::new();
        if !sites.is_empty() {
            help.push_str(&sites.join(", "));
            help.push_str(". ");
        }
        help.push_str("Give one of the methods a distinct `uri:` or change its HTTP verb");

        Self::DuplicateRoute {
            verb: verb.into(),
            uri: uri.into(),
            first,
            duplicate,
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_route_message_names_both_locations() {
        let err = GeneratorError::duplicate_route(
            "get",
            "/inspections",
            RouteLocation::new("App\\Http\\Controllers\\InspectionEntryController", "index"),
            RouteLocation::new("App\\Http\\Controllers\\InspectionEntryListController", "index"),
        );

        assert_eq!(
            err.to_string(),
            "Duplicate route detected: get /inspections\n\
             First defined in: App\\Http\\Controllers\\InspectionEntryController::index\n\
             Duplicate found in: App\\Http\\Controllers\\InspectionEntryListController::index"
        );
        let help = err.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("Give one of the methods a distinct `uri:` or change its HTTP verb"));
    }

    #[test]
    fn duplicate_route_help_points_at_declarations() {
        let span = |file: &str, line| Some(Span::new(PathBuf::from(file), line, 5, line, 30));
        let err = GeneratorError::duplicate_route(
            "get",
            "/inspections",
            RouteLocation::new("InspectionEntryController", "index").with_span(span("Entry.php", 14)),
            RouteLocation::new("InspectionEntryListController", "index").with_span(span("List.php", 20)),
        );

        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.starts_with("first at Entry.php:14:5, duplicate at List.php:20:5. "));
        assert!(err.to_string().ends_with("Duplicate found in: InspectionEntryListController::index"));
    }
}
