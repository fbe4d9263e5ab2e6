//! Newtype wrappers for identifiers.
//!
//! Anchor ids (targets of citations, links and bookmarks) and resource URIs
//! are both strings; separate types keep them from being mixed up.

use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// The `id` of a formatting object, used as a citation/link/bookmark target.
    AnchorId
);

string_id!(
    /// The location of an external resource such as an image.
    ResourceUri
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_anchor_id_creation() {
        let id1 = AnchorId::new("section-1");
        let id2 = AnchorId::from("section-1");
        let id3 = AnchorId::from(String::from("section-1"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "section-1");
        assert_eq!(id1.to_string(), "section-1");
    }

    #[test]
    fn test_anchor_ids_order_by_text() {
        let mut map = BTreeMap::new();
        map.insert(AnchorId::new("b"), 2);
        map.insert(AnchorId::new("a"), 1);
        let keys: Vec<_> = map.keys().map(AnchorId::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_resource_uri_creation() {
        let uri1 = ResourceUri::new("images/logo.png");
        let uri2 = ResourceUri::from("images/logo.png");
        assert_eq!(uri1, uri2);
        assert_eq!(uri1.as_str(), "images/logo.png");
    }
}
