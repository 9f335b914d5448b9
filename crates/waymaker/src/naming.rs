//! URI and route-name conventions.
//!
//! Every function here is pure: the same controller name, method name and
//! overrides always resolve to the same URI and route name.

/// The single-action controller method.
pub const INVOKE_METHOD: &str = "__invoke";

/// Methods that address one resource and receive an `{id}` segment.
const RESOURCE_METHODS: &[&str] = &["show", "edit", "update", "destroy"];

/// Methods that address the collection and never receive a suffix.
const COLLECTION_METHODS: &[&str] = &["index", "create", "store"];

/// Converts a name to kebab-case the way Laravel's `Str::kebab` does.
///
/// Words separated by whitespace are capitalised and joined, then a dash is
/// inserted before every upper-case character except the first.
///
/// - `"UserProfile"` → `"user-profile"`
/// - `"updateSettings"` → `"update-settings"`
/// - `"HTML"` → `"h-t-m-l"`
pub fn kebab_case(s: &str) -> String {
    let joined: String = s
        .split_whitespace()
        .flat_map(|word| {
            let mut chars = word.chars();
            let first = chars.next().map(|c| c.to_uppercase().collect::<String>());
            first.into_iter().chain(std::iter::once(chars.collect::<String>()))
        })
        .collect();

    let mut result = String::with_capacity(joined.len() + 4);
    for (i, c) in joined.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            result.push('-');
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Kebab-case controller name without its trailing `Controller` token.
///
/// `UserProfileController` → `user-profile`.
pub fn controller_base_name(controller_name: &str) -> String {
    let stem = controller_name
        .strip_suffix("Controller")
        .unwrap_or(controller_name);
    kebab_case(stem)
}

/// Resolves the absolute URI of a route.
///
/// `controller_name` is the unqualified class name. A custom URI is appended
/// to the base as written; without one, explicit parameters or the method
/// conventions decide the trailing segments.
pub fn resolve_uri(
    prefix: Option<&str>,
    custom_uri: Option<&str>,
    parameters: Option<&[String]>,
    controller_name: &str,
    method_name: &str,
) -> String {
    let base = base_uri(prefix, controller_name, method_name);

    let uri = match custom_uri {
        Some("/") => "/".to_string(),
        Some(custom) => {
            let custom = custom.trim_start_matches('/');
            if custom.is_empty() {
                base
            } else {
                join_segment(&base, custom)
            }
        }
        None => match parameters.filter(|p| !p.is_empty()) {
            Some(params) => {
                let wrapped: Vec<String> = params.iter().map(|p| format!("{{{}}}", p)).collect();
                join_segment(&base, &wrapped.join("/"))
            }
            None => apply_method_convention(base, controller_name, method_name),
        },
    };

    if uri.trim_matches('/').is_empty() {
        "/".to_string()
    } else {
        uri
    }
}

/// Resolves the dotted route name.
///
/// A non-empty custom name wins. Otherwise the controller's class path
/// relative to `base_namespace` is dotted and the method name appended,
/// except for `__invoke` whose route is named after the class alone.
pub fn resolve_route_name(
    method_name: &str,
    custom_name: Option<&str>,
    controller_class: &str,
    base_namespace: &str,
) -> String {
    if let Some(name) = custom_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let class = controller_class.trim_start_matches('\\');
    let base = base_namespace.trim_matches('\\');
    let relative = if base.is_empty() {
        class
    } else {
        class
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('\\'))
            .unwrap_or(class)
    };
    let dotted = relative.replace('\\', ".");

    if method_name == INVOKE_METHOD {
        dotted
    } else {
        format!("{}.{}", dotted, method_name)
    }
}

fn base_uri(prefix: Option<&str>, controller_name: &str, method_name: &str) -> String {
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("/{}", prefix.trim_matches('/')),
        // Unprefixed single-action controllers are mounted at the root.
        None if method_name == INVOKE_METHOD => "/".to_string(),
        None => format!("/{}", controller_base_name(controller_name)),
    }
}

fn apply_method_convention(base: String, controller_name: &str, method_name: &str) -> String {
    if RESOURCE_METHODS.contains(&method_name) {
        return join_segment(&base, "{id}");
    }
    if COLLECTION_METHODS.contains(&method_name) || method_name == INVOKE_METHOD {
        return base;
    }

    let method = kebab_case(method_name);
    let controller = controller_base_name(controller_name);
    if method == controller || controller.ends_with(&format!("-{}", method)) {
        base
    } else {
        join_segment(&base, &method)
    }
}

fn join_segment(base: &str, segment: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("UserProfile"), "user-profile");
        assert_eq!(kebab_case("updateSettings"), "update-settings");
        assert_eq!(kebab_case("index"), "index");
        assert_eq!(kebab_case("store_override"), "store_override");
        assert_eq!(kebab_case("hello world"), "hello-world");
    }

    #[test]
    fn test_controller_base_name() {
        assert_eq!(controller_base_name("UserProfileController"), "user-profile");
        assert_eq!(controller_base_name("HomeController"), "home");
        assert_eq!(controller_base_name("Dashboard"), "dashboard");
    }

    #[test]
    fn resource_methods_get_id_segment() {
        assert_eq!(resolve_uri(None, None, None, "PhotoController", "show"), "/photo/{id}");
        assert_eq!(resolve_uri(None, None, None, "PhotoController", "destroy"), "/photo/{id}");
        assert_eq!(resolve_uri(Some("photos"), None, None, "PhotoController", "edit"), "/photos/{id}");
    }

    #[test]
    fn collection_methods_use_base() {
        assert_eq!(resolve_uri(None, None, None, "MultiMethodController", "index"), "/multi-method");
        assert_eq!(resolve_uri(None, None, None, "MultiMethodController", "store"), "/multi-method");
        assert_eq!(resolve_uri(Some("/inspections/"), None, None, "InspectionController", "create"), "/inspections");
    }

    #[test]
    fn other_methods_get_kebab_suffix() {
        assert_eq!(
            resolve_uri(None, None, None, "UserProfileController", "display"),
            "/user-profile/display"
        );
        assert_eq!(
            resolve_uri(None, None, None, "AuthController", "showLogin"),
            "/auth/show-login"
        );
    }

    #[test]
    fn suffix_is_suppressed_when_it_repeats_the_controller_name() {
        assert_eq!(
            resolve_uri(None, None, None, "ChangeLanguageController", "changeLanguage"),
            "/change-language"
        );
        assert_eq!(
            resolve_uri(None, None, None, "ChangeLanguageController", "language"),
            "/change-language"
        );
        // Only hyphen-bounded suffixes count.
        assert_eq!(
            resolve_uri(None, None, None, "ChangeLanguageController", "age"),
            "/change-language/age"
        );
    }

    #[test]
    fn custom_uri_is_appended_to_base() {
        assert_eq!(
            resolve_uri(Some("inspections"), Some("/export"), None, "InspectionEntryExportController", "export"),
            "/inspections/export"
        );
        assert_eq!(
            resolve_uri(Some("resources"), Some("{id}"), None, "ResourceController", "show"),
            "/resources/{id}"
        );
        assert_eq!(
            resolve_uri(None, Some("/settings"), None, "DashboardController", "updateSettings"),
            "/dashboard/settings"
        );
    }

    #[test]
    fn custom_root_uri_is_root() {
        assert_eq!(resolve_uri(Some("admin"), Some("/"), None, "PublicController", "home"), "/");
        assert_eq!(resolve_uri(None, Some("///"), None, "PublicController", "home"), "/public");
    }

    #[test]
    fn explicit_parameters_replace_conventions() {
        let params = vec!["article:slug".to_string()];
        assert_eq!(
            resolve_uri(Some("articles"), None, Some(&params), "PrefixedArticleController", "show"),
            "/articles/{article:slug}"
        );

        let params = vec!["user".to_string(), "post".to_string()];
        assert_eq!(
            resolve_uri(None, None, Some(&params), "PostController", "index"),
            "/post/{user}/{post}"
        );
    }

    #[test]
    fn invokable_controllers() {
        assert_eq!(resolve_uri(None, None, None, "HomeController", INVOKE_METHOD), "/");
        assert_eq!(resolve_uri(Some("contact"), None, None, "ContactController", INVOKE_METHOD), "/contact");
        assert_eq!(resolve_uri(None, Some("about-us"), None, "AboutController", INVOKE_METHOD), "/about-us");

        let params = vec!["id".to_string()];
        assert_eq!(resolve_uri(None, None, Some(&params), "ShowItemController", INVOKE_METHOD), "/{id}");
    }

    #[test]
    fn test_route_names() {
        assert_eq!(
            resolve_route_name("show", None, "App\\Http\\Controllers\\Admin\\UserController", "App\\Http\\Controllers"),
            "Admin.UserController.show"
        );
        assert_eq!(
            resolve_route_name("index", None, "\\App\\Http\\Controllers\\UserController", "App\\Http\\Controllers"),
            "UserController.index"
        );
        assert_eq!(
            resolve_route_name("show", Some("custom.revenue.show"), "App\\Http\\Controllers\\RevenueController", "App\\Http\\Controllers"),
            "custom.revenue.show"
        );
        assert_eq!(
            resolve_route_name("show", Some(""), "App\\Http\\Controllers\\RevenueController", "App\\Http\\Controllers"),
            "RevenueController.show"
        );
    }

    #[test]
    fn invokable_route_name_omits_method() {
        assert_eq!(
            resolve_route_name(INVOKE_METHOD, None, "App\\Http\\Controllers\\HomeController", "App\\Http\\Controllers"),
            "HomeController"
        );
        assert_eq!(
            resolve_route_name(INVOKE_METHOD, None, "App\\Http\\Controllers\\Admin\\DashboardController", "App\\Http\\Controllers"),
            "Admin.DashboardController"
        );
    }

    #[test]
    fn class_outside_base_namespace_keeps_full_path() {
        assert_eq!(
            resolve_route_name("index", None, "Modules\\Blog\\PostController", "App\\Http\\Controllers"),
            "Modules.Blog.PostController.index"
        );
    }
}
