//! Grouping of route records by prefix and controller middleware.

use std::collections::HashMap;

use crate::ir::{RouteGroup, RouteRecord};

/// Key shared by records that render in the same group:
/// `admin::auth,verified`, `/::none`.
pub fn group_key(prefix: Option<&str>, middleware: &[String]) -> String {
    let prefix = prefix.unwrap_or("/");
    if middleware.is_empty() {
        return format!("{}::none", prefix);
    }
    let mut sorted: Vec<&str> = middleware.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("{}::{}", prefix, sorted.join(","))
}

/// Buckets records into groups in first-seen order.
#[derive(Debug, Default)]
pub struct RouteGrouper {
    groups: Vec<RouteGroup>,
    index: HashMap<String, usize>,
}

impl RouteGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to its group, opening a new group on first sight of the key.
    pub fn push(&mut self, record: RouteRecord) {
        let key = group_key(record.prefix.as_deref(), &record.controller_middleware);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.groups.push(RouteGroup::new(
                    record.prefix.clone(),
                    record.controller_middleware.clone(),
                ));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].routes.push(record);
    }

    pub fn finish(self) -> Vec<RouteGroup> {
        self.groups
    }
}

/// Groups records, preserving first-seen group and record order.
pub fn group_routes(records: impl IntoIterator<Item = RouteRecord>) -> Vec<RouteGroup> {
    let mut grouper = RouteGrouper::new();
    for record in records {
        grouper.push(record);
    }
    grouper.finish()
}
