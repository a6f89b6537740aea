//! Document references and association buckets

use serde::{Deserialize, Serialize};

use crate::text::display_text;

/// A reference to a document as surfaced by one discovery call.
///
/// `source_path` is the path that should be opened when the reference is
/// activated; for entities produced from the active document's own metadata
/// this is the active document, not the target. `link_text` is the display
/// identity (path with a known extension stripped and any sub-reference
/// removed) and is the key the call-scoped dedup sets operate on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntity {
    pub source_path: String,
    pub link_text: String,
}

impl FileEntity {
    pub fn new(source_path: impl Into<String>, link_text: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            link_text: link_text.into(),
        }
    }

    /// Build an entity for a vault path, deriving the display text from it.
    pub fn from_path(path: &str) -> Self {
        Self {
            source_path: path.to_string(),
            link_text: display_text(path),
        }
    }
}

/// One bucket of associated documents.
///
/// `property` is the shared tag, the display name of the shared link target,
/// or the matched frontmatter value. `category` records which dimension
/// produced the bucket: `"links"`, `"tags"`, or a frontmatter field name.
/// Buckets are never emitted empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyLinks {
    pub property: String,
    pub category: String,
    pub entities: Vec<FileEntity>,
}

impl PropertyLinks {
    pub fn new(
        property: impl Into<String>,
        category: impl Into<String>,
        entities: Vec<FileEntity>,
    ) -> Self {
        Self {
            property: property.into(),
            category: category.into(),
            entities,
        }
    }
}

/// The atomic result of one discovery call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLinks {
    /// References that resolve to no existing document.
    pub new_links: Vec<FileEntity>,
    /// Documents associated with the active document by direct relation:
    /// inbound links, tag-as-name references, outbound links, canvas nodes.
    /// In no-context mode this carries the full sorted document listing.
    pub backward_links: Vec<FileEntity>,
    /// Link-group buckets followed by tag-group buckets.
    pub tag_links: Vec<PropertyLinks>,
    /// Frontmatter-property buckets, one run per configured field.
    pub frontmatter_links: Vec<PropertyLinks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_from_path_strips_extension() {
        let entity = FileEntity::from_path("notes/Rust.md");
        assert_eq!(entity.source_path, "notes/Rust.md");
        assert_eq!(entity.link_text, "notes/Rust");
    }

    #[test]
    fn entity_identity_is_the_pair() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(FileEntity::new("a.md", "a"));
        set.insert(FileEntity::new("a.md", "a"));
        set.insert(FileEntity::new("b.md", "a"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn discovered_links_serialize_round_trip() {
        let result = DiscoveredLinks {
            new_links: vec![FileEntity::new("a.md", "missing")],
            backward_links: vec![],
            tag_links: vec![PropertyLinks::new("rust", "tags", vec![FileEntity::new("a.md", "b")])],
            frontmatter_links: vec![],
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: DiscoveredLinks = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
