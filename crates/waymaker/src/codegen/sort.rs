//! Route ordering within a group.
//!
//! Laravel matches routes in registration order, so static segments must be
//! registered before parameterised ones at the same depth.

use std::cmp::Ordering;

use crate::ir::RouteRecord;

/// Orders URIs by depth, then by parameter count, then lexically.
pub fn compare_specificity(a: &str, b: &str) -> Ordering {
    let depth = |uri: &str| uri.matches('/').count();
    let params = |uri: &str| uri.matches('{').count();

    depth(a)
        .cmp(&depth(b))
        .then_with(|| params(a).cmp(&params(b)))
        .then_with(|| a.cmp(b))
}

/// Stable sort of routes by specificity.
pub fn sort_by_specificity(routes: &mut [RouteRecord]) {
    routes.sort_by(|a, b| compare_specificity(&a.uri, &b.uri));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_segments_precede_parameters() {
        let mut uris = vec![
            "/inspections/{id}/edit",
            "/inspections/admin/users",
            "/inspections/{id}",
            "/inspections/create",
            "/inspections",
        ];
        uris.sort_by(|a, b| compare_specificity(a, b));
        assert_eq!(
            uris,
            vec![
                "/inspections",
                "/inspections/create",
                "/inspections/{id}",
                "/inspections/admin/users",
                "/inspections/{id}/edit",
            ]
        );
    }

    #[test]
    fn equal_uris_compare_equal() {
        assert_eq!(compare_specificity("/photos", "/photos"), Ordering::Equal);
        assert_eq!(compare_specificity("/a", "/b"), Ordering::Less);
    }
}
