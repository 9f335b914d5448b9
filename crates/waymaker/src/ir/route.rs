//! Resolved routes and route groups.

use serde::Serialize;

use super::HttpVerb;

/// One route produced from a routed controller method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub verb: HttpVerb,
    /// Fully resolved absolute URI (`/users/{id}`).
    pub uri: String,
    /// Fully qualified controller class name.
    pub controller_class: String,
    /// Method name invoked by the route.
    pub action: String,
    pub route_name: String,
    /// Prefix of the owning controller.
    pub prefix: Option<String>,
    /// Controller middleware followed by route middleware, deduplicated.
    pub combined_middleware: Vec<String>,
    /// Route-declared middleware not already applied by the controller.
    pub route_middleware: Vec<String>,
    pub controller_middleware: Vec<String>,
}

impl RouteRecord {
    /// Whether the route targets a single-action (`__invoke`) controller.
    pub fn is_single_action(&self) -> bool {
        self.action == crate::naming::INVOKE_METHOD
    }
}

/// Routes sharing a prefix and controller-level middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteGroup {
    pub prefix: Option<String>,
    pub middleware: Vec<String>,
    pub routes: Vec<RouteRecord>,
}

impl RouteGroup {
    pub fn new(prefix: Option<String>, middleware: Vec<String>) -> Self {
        Self {
            prefix,
            middleware,
            routes: Vec::new(),
        }
    }

    /// Whether the group renders inside a `Route::...->group()` wrapper.
    pub fn is_wrapped(&self) -> bool {
        self.prefix.is_some() || !self.middleware.is_empty()
    }
}
