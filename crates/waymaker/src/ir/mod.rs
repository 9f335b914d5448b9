//! Language-agnostic intermediate representation.
//!
//! Frontends produce [`ControllerIR`]; the scanner turns it into
//! [`RouteRecord`]s which code generation groups and renders.

mod controller;
mod route;
mod verb;

pub use controller::{ControllerIR, MethodIR, MiddlewareSpec, RouteDeclaration};
pub use route::{RouteGroup, RouteRecord};
pub use verb::HttpVerb;
