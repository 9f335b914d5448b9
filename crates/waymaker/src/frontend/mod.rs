//! Language frontends for turning controller source into IR.
//!
//! A frontend stands in for runtime reflection: it discovers controller
//! classes under the configured directory, parses them, and reports each
//! class's public methods with their route declarations.

pub mod php;

use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;
use crate::ir::ControllerIR;

/// Trait for language frontends.
pub trait Frontend {
    /// Returns the language name (e.g., "php").
    fn language(&self) -> &str;

    /// Returns file extensions this frontend handles (e.g., ["php"]).
    fn extensions(&self) -> &[&str];

    /// Discovers every controller under `config.controller_dir`.
    ///
    /// Controllers are returned in deterministic file-name order. A missing
    /// directory yields an empty list.
    fn discover(&mut self, config: &GeneratorConfig) -> Result<Vec<ControllerIR>, GeneratorError>;
}

/// Creates a frontend for the given language.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, GeneratorError> {
    match language {
        "php" => Ok(Box::new(php::PhpFrontend::new()?)),
        _ => Err(GeneratorError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}
