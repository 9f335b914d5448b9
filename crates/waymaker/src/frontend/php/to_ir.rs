//! Convert PHP AST to controller IR.

use std::collections::{HashMap, HashSet};

use crate::config::GeneratorConfig;
use crate::ir::{ControllerIR, HttpVerb, MethodIR, MiddlewareSpec, RouteDeclaration};
use super::ast::*;

/// Positional order of route attribute arguments.
const POSITIONAL_ARGUMENTS: [&str; 4] = ["uri", "name", "parameters", "middleware"];

const ROUTE_PREFIX_PROPERTY: &str = "routePrefix";
const ROUTE_MIDDLEWARE_PROPERTY: &str = "routeMiddleware";

/// A parsed source file from the controller tree.
#[derive(Debug)]
pub struct DiscoveredFile {
    /// Class the file is expected to declare, derived from its path.
    /// `None` for supporting files that only serve as parent classes.
    pub class_name: Option<String>,
    pub parsed: ParsedFile,
}

/// Classes across all discovered files, keyed by lower-cased FQCN.
struct ClassIndex<'a> {
    classes: HashMap<String, (&'a ClassDecl, &'a ParsedFile)>,
}

impl<'a> ClassIndex<'a> {
    fn build(files: &'a [DiscoveredFile]) -> Self {
        let mut classes = HashMap::new();
        for file in files {
            for class in &file.parsed.classes {
                classes
                    .entry(class.qualified_name().to_lowercase())
                    .or_insert((class, &file.parsed));
            }
        }
        Self { classes }
    }

    fn parent_of(&self, class: &ClassDecl, file: &ParsedFile) -> Option<(&'a ClassDecl, &'a ParsedFile)> {
        let raw = class.parent.as_deref()?;
        let resolved = resolve_class_name(raw, class.namespace.as_deref(), &file.imports);
        self.classes.get(&resolved.to_lowercase()).copied()
    }

    /// A static property declared on `class` or, failing that, on the
    /// nearest discovered ancestor that declares it.
    fn inherited_static(&self, class: &'a ClassDecl, file: &'a ParsedFile, name: &str) -> Option<&'a PropertyDecl> {
        let mut visited = HashSet::new();
        let mut current = (class, file);
        loop {
            if let Some(prop) = current.0.static_property(name) {
                return Some(prop);
            }
            if !visited.insert(current.0.qualified_name().to_lowercase()) {
                tracing::warn!(class = %class.qualified_name(), "circular inheritance while resolving ${}", name);
                return None;
            }
            current = self.parent_of(current.0, current.1)?;
        }
    }
}

/// Converts discovered files to controller IR, in file order.
///
/// Files that do not declare their expected class, and abstract classes,
/// produce no controller.
pub fn to_ir(files: &[DiscoveredFile], config: &GeneratorConfig) -> Vec<ControllerIR> {
    let index = ClassIndex::build(files);
    let mut controllers = Vec::new();

    for file in files {
        let Some(expected) = &file.class_name else {
            continue;
        };

        let Some(class) = file.parsed.find_class(expected) else {
            tracing::debug!(
                path = %file.parsed.path.display(),
                class = %expected,
                "skipping file: expected class not declared"
            );
            continue;
        };

        if class.is_abstract {
            tracing::debug!(class = %expected, "skipping abstract controller");
            continue;
        }

        controllers.push(convert_controller(class, &file.parsed, &index, config));
    }

    controllers
}

fn convert_controller<'a>(
    class: &'a ClassDecl,
    file: &'a ParsedFile,
    index: &ClassIndex<'a>,
    config: &GeneratorConfig,
) -> ControllerIR {
    let class_name = class.qualified_name();
    let mut controller = ControllerIR::new(&class_name);
    controller.source_path = file.path.clone();

    controller.route_prefix = index
        .inherited_static(class, file, ROUTE_PREFIX_PROPERTY)
        .and_then(|prop| route_prefix(prop, &class_name));
    controller.route_middleware = index
        .inherited_static(class, file, ROUTE_MIDDLEWARE_PROPERTY)
        .map(|prop| route_middleware(prop, &class_name))
        .unwrap_or_default();

    for method in &class.methods {
        if method.visibility != Visibility::Public {
            continue;
        }

        let declaration = method.attributes.iter().find_map(|attr| {
            let verb = recognise_route_attribute(attr, class, file, config)?;
            Some(route_declaration(attr, verb, &class_name, &method.name))
        });

        let mut ir = MethodIR::new(&method.name, declaration);
        ir.span = Some(method.span.clone());
        controller.methods.push(ir);
    }

    controller
}

/// Resolves a class name as written to a fully qualified name, applying
/// PHP's rules for qualified, fully qualified and imported names.
pub fn resolve_class_name(raw: &str, namespace: Option<&str>, imports: &[UseImport]) -> String {
    let raw = raw.trim();
    if let Some(fully_qualified) = raw.strip_prefix('\\') {
        return fully_qualified.to_string();
    }

    let qualify = |name: &str| match namespace {
        Some(ns) if !ns.is_empty() => format!("{}\\{}", ns, name),
        _ => name.to_string(),
    };

    if let Some(rest) = raw
        .get(..10)
        .filter(|kw| kw.eq_ignore_ascii_case("namespace\\"))
        .map(|_| &raw[10..])
    {
        return qualify(rest);
    }

    let (first, rest) = match raw.split_once('\\') {
        Some((first, rest)) => (first, Some(rest)),
        None => (raw, None),
    };

    match imports.iter().find(|import| import.alias.eq_ignore_ascii_case(first)) {
        Some(import) => match rest {
            Some(rest) => format!("{}\\{}", import.name, rest),
            None => import.name.clone(),
        },
        None => qualify(raw),
    }
}

/// The verb of a route attribute, when `attr` names one of the route
/// attribute classes.
fn recognise_route_attribute(
    attr: &AttributeDecl,
    class: &ClassDecl,
    file: &ParsedFile,
    config: &GeneratorConfig,
) -> Option<HttpVerb> {
    let resolved = resolve_class_name(&attr.name, class.namespace.as_deref(), &file.imports);
    let (namespace, short) = resolved.rsplit_once('\\')?;
    if !namespace.eq_ignore_ascii_case(config.attribute_namespace()) {
        return None;
    }
    HttpVerb::from_attribute_name(short)
}

fn route_declaration(attr: &AttributeDecl, verb: HttpVerb, class: &str, method: &str) -> RouteDeclaration {
    let mut declaration = RouteDeclaration::new(verb);

    for (position, argument) in attr.arguments.iter().enumerate() {
        let slot = match &argument.name {
            Some(name) => name.as_str(),
            None => POSITIONAL_ARGUMENTS.get(position).copied().unwrap_or(""),
        };
        let value = &argument.value;

        match slot {
            "uri" => declaration.uri = optional_string(value, class, method, slot),
            "name" => declaration.name = optional_string(value, class, method, slot),
            "parameters" => {
                declaration.parameters = match value {
                    PhpValue::Null => None,
                    PhpValue::Array(items) => Some(string_items(items, class, method, slot)),
                    other => {
                        warn_argument(class, method, slot, other);
                        None
                    }
                };
            }
            "middleware" => {
                declaration.middleware = match value {
                    PhpValue::Null => None,
                    PhpValue::String(s) => Some(MiddlewareSpec::Single(s.clone())),
                    PhpValue::Array(items) => Some(MiddlewareSpec::List(string_items(items, class, method, slot))),
                    other => {
                        warn_argument(class, method, slot, other);
                        None
                    }
                };
            }
            _ => {
                tracing::warn!(
                    class = %class,
                    method = %method,
                    "ignoring unknown route attribute argument '{}'",
                    argument.name.as_deref().unwrap_or("#extra")
                );
            }
        }
    }

    declaration
}

fn optional_string(value: &PhpValue, class: &str, method: &str, slot: &str) -> Option<String> {
    match value {
        PhpValue::Null => None,
        PhpValue::String(s) => Some(s.clone()),
        other => {
            warn_argument(class, method, slot, other);
            None
        }
    }
}

fn string_items(items: &[PhpValue], class: &str, method: &str, slot: &str) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                warn_argument(class, method, slot, item);
                None
            }
        })
        .collect()
}

fn warn_argument(class: &str, method: &str, slot: &str, value: &PhpValue) {
    tracing::warn!(
        class = %class,
        method = %method,
        "ignoring route attribute argument '{}': unsupported {} value",
        slot,
        value.kind()
    );
}

fn route_prefix(prop: &PropertyDecl, class: &str) -> Option<String> {
    match &prop.value {
        None | Some(PhpValue::Null) => None,
        Some(PhpValue::String(prefix)) => Some(prefix.clone()),
        Some(other) => {
            tracing::warn!(class = %class, "ignoring ${}: unsupported {} value", ROUTE_PREFIX_PROPERTY, other.kind());
            None
        }
    }
}

fn route_middleware(prop: &PropertyDecl, class: &str) -> Vec<String> {
    match &prop.value {
        None | Some(PhpValue::Null) => Vec::new(),
        Some(PhpValue::String(entry)) => vec![entry.clone()],
        Some(PhpValue::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let entry = item.as_str().map(str::to_string);
                if entry.is_none() {
                    tracing::warn!(class = %class, "ignoring non-string ${} entry", ROUTE_MIDDLEWARE_PROPERTY);
                }
                entry
            })
            .collect(),
        Some(other) => {
            tracing::warn!(class = %class, "ignoring ${}: unsupported {} value", ROUTE_MIDDLEWARE_PROPERTY, other.kind());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::frontend::php::parser::PhpParser;

    fn discovered(class_name: Option<&str>, path: &str, source: &str) -> DiscoveredFile {
        let mut parser = PhpParser::new().unwrap();
        DiscoveredFile {
            class_name: class_name.map(str::to_string),
            parsed: parser.parse(source, Path::new(path)).unwrap(),
        }
    }

    fn imports(list: &[(&str, &str)]) -> Vec<UseImport> {
        list.iter()
            .map(|(name, alias)| UseImport {
                name: name.to_string(),
                alias: alias.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_resolve_class_name() {
        let imports = imports(&[("HardImpact\\Waymaker\\Get", "Get"), ("HardImpact\\Waymaker", "Waymaker")]);
        let ns = Some("App\\Http\\Controllers");

        assert_eq!(resolve_class_name("Get", ns, &imports), "HardImpact\\Waymaker\\Get");
        assert_eq!(resolve_class_name("Waymaker\\Post", ns, &imports), "HardImpact\\Waymaker\\Post");
        assert_eq!(resolve_class_name("\\HardImpact\\Waymaker\\Put", ns, &imports), "HardImpact\\Waymaker\\Put");
        assert_eq!(resolve_class_name("Controller", ns, &imports), "App\\Http\\Controllers\\Controller");
        assert_eq!(resolve_class_name("namespace\\Admin\\Base", ns, &imports), "App\\Http\\Controllers\\Admin\\Base");
        assert_eq!(resolve_class_name("Get", None, &[]), "Get");
    }

    #[test]
    fn only_route_attributes_from_the_attribute_namespace_are_recognised() {
        let files = vec![discovered(
            Some("App\\Http\\Controllers\\MixedController"),
            "MixedController.php",
            r#"<?php
namespace App\Http\Controllers;

use HardImpact\Waymaker\Get;
use HardImpact\Waymaker as Routes;
use Other\Attributes\Post;

class MixedController
{
    #[Get]
    public function index() {}

    #[Post]
    public function store() {}

    #[Deprecated, Routes\Delete('remove')]
    public function destroy() {}

    #[Get]
    protected function hidden() {}
}
"#,
        )];

        let controllers = to_ir(&files, &GeneratorConfig::default());
        assert_eq!(controllers.len(), 1);
        let methods = &controllers[0].methods;
        assert_eq!(methods.len(), 3);
        assert_eq!(methods[0].declaration.as_ref().map(|d| d.verb), Some(HttpVerb::Get));
        assert!(methods[1].declaration.is_none());

        let destroy = methods[2].declaration.as_ref().unwrap();
        assert_eq!(destroy.verb, HttpVerb::Delete);
        assert_eq!(destroy.uri.as_deref(), Some("remove"));
    }

    #[test]
    fn route_arguments_positional_and_named() {
        let files = vec![discovered(
            Some("App\\Http\\Controllers\\ArticleController"),
            "ArticleController.php",
            r#"<?php
namespace App\Http\Controllers;

use HardImpact\Waymaker\{Get, Put};

class ArticleController
{
    #[Get(parameters: ['article:slug'], name: 'articles.show')]
    public function show() {}

    #[Put('{article}', null, [], ['auth', 'can:update'])]
    public function update() {}

    #[Get(uri: 42)]
    public function broken() {}
}
"#,
        )];

        let controllers = to_ir(&files, &GeneratorConfig::default());
        let methods = &controllers[0].methods;

        let show = methods[0].declaration.as_ref().unwrap();
        assert_eq!(show.parameters, Some(vec!["article:slug".to_string()]));
        assert_eq!(show.name.as_deref(), Some("articles.show"));
        assert_eq!(show.uri, None);

        let update = methods[1].declaration.as_ref().unwrap();
        assert_eq!(update.uri.as_deref(), Some("{article}"));
        assert_eq!(update.name, None);
        assert_eq!(update.parameters, Some(Vec::new()));
        assert_eq!(
            update.middleware,
            Some(MiddlewareSpec::List(vec!["auth".to_string(), "can:update".to_string()]))
        );

        // Unsupported values are ignored, the route itself survives.
        let broken = methods[2].declaration.as_ref().unwrap();
        assert_eq!(broken.uri, None);
    }

    #[test]
    fn statics_are_inherited_from_discovered_parents() {
        let files = vec![
            discovered(
                Some("App\\Http\\Controllers\\Admin\\BaseAdminController"),
                "Admin/BaseAdminController.php",
                r#"<?php
namespace App\Http\Controllers\Admin;

abstract class BaseAdminController
{
    protected static string $routePrefix = 'admin';
    protected static $routeMiddleware = 'auth';
}
"#,
            ),
            discovered(
                Some("App\\Http\\Controllers\\Admin\\ReportController"),
                "Admin/ReportController.php",
                r#"<?php
namespace App\Http\Controllers\Admin;

use HardImpact\Waymaker\Get;

class ReportController extends BaseAdminController
{
    protected static ?string $routePrefix = null;

    #[Get]
    public function index() {}
}
"#,
            ),
            discovered(
                Some("App\\Http\\Controllers\\Admin\\UserController"),
                "Admin/UserController.php",
                r#"<?php
namespace App\Http\Controllers\Admin;

use HardImpact\Waymaker\Get;

class UserController extends BaseAdminController
{
    #[Get]
    public function index() {}
}
"#,
            ),
        ];

        let controllers = to_ir(&files, &GeneratorConfig::default());
        // The abstract base produces no controller.
        assert_eq!(controllers.len(), 2);

        let report = &controllers[0];
        assert_eq!(report.route_prefix, None);
        assert_eq!(report.route_middleware, vec!["auth"]);

        let user = &controllers[1];
        assert_eq!(user.route_prefix.as_deref(), Some("admin"));
        assert_eq!(user.route_middleware, vec!["auth"]);
    }

    #[test]
    fn file_without_expected_class_is_skipped() {
        let files = vec![discovered(
            Some("App\\Http\\Controllers\\WrongController"),
            "WrongController.php",
            "<?php\nnamespace App\\Http\\Controllers;\nclass SomethingElse {}\n",
        )];
        assert!(to_ir(&files, &GeneratorConfig::default()).is_empty());
    }
}
