//! Duplicate route detection.

use std::collections::HashMap;

use crate::diagnostic::{GeneratorError, RouteLocation};
use crate::ir::HttpVerb;

/// Key identifying a route to the router: `get:/users/{id}`.
pub fn conflict_key(verb: HttpVerb, uri: &str) -> String {
    format!("{}:{}", verb.as_str(), uri)
}

/// Tracks which controller method claimed each `(verb, uri)` pair.
#[derive(Debug, Default)]
pub struct ConflictRegistry {
    claimed: HashMap<String, RouteLocation>,
}

impl ConflictRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `(verb, uri)` for `location`.
    ///
    /// Fails with [`GeneratorError::DuplicateRoute`] when another method
    /// already holds the pair. The registry is left unchanged in that case.
    pub fn claim(&mut self, verb: HttpVerb, uri: &str, location: RouteLocation) -> Result<(), GeneratorError> {
        let key = conflict_key(verb, uri);
        if let Some(first) = self.claimed.get(&key) {
            return Err(GeneratorError::duplicate_route(verb.as_str(), uri, first.clone(), location));
        }
        self.claimed.insert(key, location);
        Ok(())
    }

    /// Number of claimed routes.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// True until the first route is claimed.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
