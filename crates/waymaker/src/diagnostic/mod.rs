//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::{GeneratorError, RouteLocation};
pub use span::Span;
