//! Laravel router statement rendering.

use crate::ir::{RouteGroup, RouteRecord};

const INDENT: &str = "    ";

/// Where the renderer currently is in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RenderState {
    /// Statements are emitted at the top level.
    NoGroup,
    /// Statements are emitted inside `->group(function () { ... })`.
    InGroup { prefix: Option<String> },
}

/// Quotes a value as a PHP string literal.
///
/// Values with control characters use a double-quoted literal so the
/// characters survive as escapes and never reach the file raw.
pub fn php_string(value: &str) -> String {
    if value.chars().any(char::is_control) {
        return php_double_quoted(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn php_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    out.push('"');
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `'auth'` for one entry, `['auth', 'verified']` for several.
pub fn format_middleware(middleware: &[String]) -> String {
    match middleware {
        [single] => php_string(single),
        many => {
            let items: Vec<String> = many.iter().map(|m| php_string(m)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// Renders one route statement with the given URI.
pub fn render_route(route: &RouteRecord, uri: &str) -> String {
    let mut statement = format!(
        "Route::{}({}, [\\{}::class, {}])->name({})",
        route.verb.as_str(),
        php_string(uri),
        route.controller_class.trim_start_matches('\\'),
        php_string(&route.action),
        php_string(&route.route_name),
    );
    if !route.route_middleware.is_empty() {
        statement.push_str(&format!("->middleware({})", format_middleware(&route.route_middleware)));
    }
    statement.push(';');
    statement
}

/// Renders groups into output lines. Groups are separated by a blank line.
pub fn render_groups(groups: &[RouteGroup]) -> Vec<String> {
    let mut renderer = Renderer::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            renderer.lines.push(String::new());
        }
        renderer.render_group(group);
    }
    renderer.finish()
}

struct Renderer {
    lines: Vec<String>,
    state: RenderState,
}

impl Renderer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            state: RenderState::NoGroup,
        }
    }

    fn render_group(&mut self, group: &RouteGroup) {
        if group.is_wrapped() {
            self.open(group);
            for route in &group.routes {
                let uri = self.group_uri(route);
                self.lines.push(format!("{}{}", INDENT, render_route(route, &uri)));
            }
            self.close();
        } else {
            for route in &group.routes {
                self.lines.push(render_route(route, &top_level_uri(route)));
            }
        }
    }

    fn open(&mut self, group: &RouteGroup) {
        let mut opening = String::from("Route::");
        if let Some(prefix) = &group.prefix {
            opening.push_str(&format!("prefix({})", php_string(prefix)));
            if !group.middleware.is_empty() {
                opening.push_str("->");
            }
        }
        if !group.middleware.is_empty() {
            opening.push_str(&format!("middleware({})", format_middleware(&group.middleware)));
        }
        opening.push_str("->group(function () {");

        self.lines.push(opening);
        self.state = RenderState::InGroup {
            prefix: group.prefix.clone(),
        };
    }

    fn close(&mut self) {
        self.lines.push("});".to_string());
        self.state = RenderState::NoGroup;
    }

    fn group_uri(&self, route: &RouteRecord) -> String {
        match &self.state {
            RenderState::InGroup { prefix: Some(prefix) } => relative_to_prefix(&route.uri, prefix),
            _ => route.uri.clone(),
        }
    }

    fn finish(self) -> Vec<String> {
        debug_assert_eq!(self.state, RenderState::NoGroup);
        self.lines
    }
}

/// URI of a route inside `Route::prefix(prefix)`.
fn relative_to_prefix(uri: &str, prefix: &str) -> String {
    if uri == "/" {
        return uri.to_string();
    }
    let literal = format!("/{}", prefix.trim_matches('/'));
    let rest = match uri.strip_prefix(&literal) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => uri,
    };
    rest.trim_start_matches('/').to_string()
}

/// URI of a route outside any group.
fn top_level_uri(route: &RouteRecord) -> String {
    if route.prefix.is_none() && route.is_single_action() && route.uri != "/" {
        route.uri.trim_start_matches('/').to_string()
    } else {
        route.uri.clone()
    }
}
