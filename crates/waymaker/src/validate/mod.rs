//! Validation of resolved routes.

pub mod conflicts;

pub use conflicts::{conflict_key, ConflictRegistry};
