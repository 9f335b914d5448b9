//! Method scanner: controller IR to route records.

use crate::config::GeneratorConfig;
use crate::diagnostic::{GeneratorError, RouteLocation};
use crate::ir::{ControllerIR, HttpVerb, MethodIR, RouteDeclaration, RouteRecord};
use crate::naming::{self, INVOKE_METHOD};
use crate::validate::ConflictRegistry;

/// A public method with no route attribute whose name matches the
/// verb-defaults table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnroutedMethod {
    pub class: String,
    pub method: String,
    pub suggested: HttpVerb,
}

/// Everything the scanner found in one run.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Routes in discovery order.
    pub records: Vec<RouteRecord>,
    pub unrouted: Vec<UnroutedMethod>,
}

/// Magic methods never become routes, except the single-action `__invoke`.
pub fn is_lifecycle_method(name: &str) -> bool {
    name.starts_with("__") && name != INVOKE_METHOD
}

/// Merges controller and route middleware.
///
/// Returns the combined list (controller first, first occurrence wins) and
/// the route entries the controller does not already apply.
pub fn merge_middleware(controller: &[String], route: &[String]) -> (Vec<String>, Vec<String>) {
    let mut combined: Vec<String> = Vec::with_capacity(controller.len() + route.len());
    for entry in controller.iter().chain(route) {
        if !combined.contains(entry) {
            combined.push(entry.clone());
        }
    }

    let mut route_only: Vec<String> = Vec::new();
    for entry in route {
        if !controller.contains(entry) && !route_only.contains(entry) {
            route_only.push(entry.clone());
        }
    }

    (combined, route_only)
}

/// Scans every controller in order, claiming each route in a fresh registry.
pub fn scan_controllers(controllers: &[ControllerIR], config: &GeneratorConfig) -> Result<ScanOutput, GeneratorError> {
    let mut registry = ConflictRegistry::new();
    let mut output = ScanOutput::default();

    for controller in controllers {
        scan_controller(controller, config, &mut registry, &mut output)?;
    }

    tracing::debug!(
        routes = output.records.len(),
        controllers = controllers.len(),
        "scanned controllers"
    );
    Ok(output)
}

/// Scans one controller's methods into `output`.
pub fn scan_controller(
    controller: &ControllerIR,
    config: &GeneratorConfig,
    registry: &mut ConflictRegistry,
    output: &mut ScanOutput,
) -> Result<(), GeneratorError> {
    let prefix = controller
        .route_prefix
        .as_deref()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty());

    for method in &controller.methods {
        if is_lifecycle_method(&method.name) {
            continue;
        }

        let Some(declaration) = &method.declaration else {
            if let Some(verb) = config.method_defaults.suggest(&method.name) {
                output.unrouted.push(UnroutedMethod {
                    class: controller.class_name.clone(),
                    method: method.name.clone(),
                    suggested: verb,
                });
            }
            continue;
        };

        let record = build_record(controller, method, declaration, prefix, config);
        let location = RouteLocation::new(&controller.class_name, &method.name).with_span(method.span.clone());
        registry.claim(declaration.verb, &record.uri, location)?;
        output.records.push(record);
    }

    Ok(())
}

fn build_record(
    controller: &ControllerIR,
    method: &MethodIR,
    declaration: &RouteDeclaration,
    prefix: Option<&str>,
    config: &GeneratorConfig,
) -> RouteRecord {
    let uri = naming::resolve_uri(
        prefix,
        declaration.uri.as_deref(),
        declaration.parameters.as_deref(),
        controller.short_name(),
        &method.name,
    );
    let route_name = naming::resolve_route_name(
        &method.name,
        declaration.name.as_deref(),
        &controller.class_name,
        config.namespace(),
    );
    let (combined_middleware, route_middleware) =
        merge_middleware(&controller.route_middleware, &declaration.middleware_list());

    RouteRecord {
        verb: declaration.verb,
        uri,
        controller_class: controller.class_name.clone(),
        action: method.name.clone(),
        route_name,
        prefix: prefix.map(str::to_string),
        combined_middleware,
        route_middleware,
        controller_middleware: controller.route_middleware.clone(),
    }
}
