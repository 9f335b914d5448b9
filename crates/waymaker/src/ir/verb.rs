//! HTTP verbs carried by route declarations.

use std::fmt;
use serde::{Deserialize, Serialize};

/// HTTP verb of a route declaration.
///
/// Each route attribute kind (`Get`, `Post`, ...) implies exactly one verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// All verbs, in the order the defaults table is consulted.
    pub const ALL: [HttpVerb; 5] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Patch,
        HttpVerb::Delete,
    ];

    /// Lower-case form used by the router facade (`Route::get`) and conflict keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Patch => "patch",
            HttpVerb::Delete => "delete",
        }
    }

    /// Short attribute class name that declares this verb.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Put => "Put",
            HttpVerb::Patch => "Patch",
            HttpVerb::Delete => "Delete",
        }
    }

    /// Maps an attribute short name to its verb. PHP class names are case-insensitive.
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.attribute_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_are_case_insensitive() {
        assert_eq!(HttpVerb::from_attribute_name("Get"), Some(HttpVerb::Get));
        assert_eq!(HttpVerb::from_attribute_name("DELETE"), Some(HttpVerb::Delete));
        assert_eq!(HttpVerb::from_attribute_name("Route"), None);
    }

    #[test]
    fn display_is_upper_case() {
        assert_eq!(HttpVerb::Patch.to_string(), "PATCH");
        assert_eq!(HttpVerb::Patch.as_str(), "patch");
    }
}
