//! Waymaker CLI UI primitives.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use waymaker::{HttpVerb, RouteGroup, RouteRecord, UnroutedMethod};

/// Terminal palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const AMBER: Color = Color::Color256(214);
    pub const VIOLET: Color = Color::Color256(135);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}"; // ◉
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
}

/// Print a success message
pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND).fg(colors::AMBER), style(msg).fg(colors::AMBER));
}

/// Print an info message
pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN), msg);
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}"); // ◎◉◎◉
    pb.set_style(template);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

const BOX_WIDTH: usize = 55;

/// Dashes that follow a padded title in a box header.
fn header_dashes(title_padded: &str) -> usize {
    BOX_WIDTH.saturating_sub(title_padded.chars().count() + 4)
}

/// Print a box header
pub fn box_header(title: &str) {
    let title_padded = format!(" {} ", title);
    let dashes = header_dashes(&title_padded);

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::CYAN), // ╭─
        style(title_padded).fg(colors::CYAN).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::CYAN),
        style("\u{256E}").fg(colors::CYAN) // ╮
    );
}

/// Print a box footer
pub fn box_footer() {
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::CYAN), // ╰
        style("\u{2500}".repeat(BOX_WIDTH - 2)).fg(colors::CYAN),
        style("\u{256F}").fg(colors::CYAN) // ╯
    );
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Print one route group as it will be registered.
pub fn route_group(group: &RouteGroup) {
    let title = match (&group.prefix, group.middleware.is_empty()) {
        (Some(prefix), true) => format!("prefix {}", prefix),
        (Some(prefix), false) => format!("prefix {} {} {}", prefix, symbols::DOT, group.middleware.join(", ")),
        (None, false) => format!("middleware {}", group.middleware.join(", ")),
        (None, true) => "top level".to_string(),
    };
    box_header(&title);
    for route in &group.routes {
        route_line(route);
    }
    box_footer();
}

fn route_line(route: &RouteRecord) {
    let short_class = route
        .controller_class
        .rsplit('\\')
        .next()
        .unwrap_or(&route.controller_class);

    println!(
        "  {} {} {:<32} {}@{} {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        verb_label(route.verb),
        route.uri,
        short_class,
        route.action,
        style(&route.route_name).fg(colors::DIM)
    );
}

fn verb_label(verb: HttpVerb) -> String {
    let label = format!("{:<6}", verb.as_str().to_uppercase());
    match verb {
        HttpVerb::Get => style(label).fg(colors::NEON_GREEN).to_string(),
        HttpVerb::Delete => style(label).fg(colors::MAGENTA).to_string(),
        _ => style(label).fg(colors::VIOLET).to_string(),
    }
}

/// Print hints for public methods that look like actions but have no route.
pub fn unrouted(methods: &[UnroutedMethod]) {
    if methods.is_empty() {
        return;
    }
    println!();
    warn(&format!("{} method(s) look like actions but have no route attribute:", methods.len()));
    for method in methods {
        dim(&format!(
            "    {}::{}  (add #[{}])",
            method.class,
            method.method,
            method.suggested.attribute_name()
        ));
    }
}
