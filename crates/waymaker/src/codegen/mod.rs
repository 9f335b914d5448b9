//! Route file generation from resolved route records.
//!
//! Records are grouped by prefix and controller middleware, each group is
//! ordered by specificity, and the groups are rendered as Laravel router
//! statements.

pub mod group;
pub mod render;
pub mod sort;

use crate::ir::{RouteGroup, RouteRecord};

/// Fixed preamble of the generated route file.
pub const FILE_HEADER: &str = "<?php\n\ndeclare(strict_types=1);\n\nuse Illuminate\\Support\\Facades\\Route;\n\n";

/// Groups and orders records as they will be rendered.
pub fn plan(records: &[RouteRecord]) -> Vec<RouteGroup> {
    let mut groups = group::group_routes(records.iter().cloned());
    for group in &mut groups {
        sort::sort_by_specificity(&mut group.routes);
    }
    groups
}

/// Composes the full route file from definition lines.
pub fn compose_file(lines: &[String]) -> String {
    let mut content = String::from(FILE_HEADER);
    content.push_str(&lines.join("\n"));
    content.push('\n');
    content
}
