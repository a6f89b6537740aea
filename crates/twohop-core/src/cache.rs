//! Per-document metadata snapshot served by the index

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extracted metadata for one document, as served by
/// [`MetadataIndex::file_cache`](crate::traits::MetadataIndex::file_cache).
///
/// Link fields hold raw link keys exactly as written in the document,
/// including any `#section` or `#^block` sub-reference. A document with no
/// cache entry at all is treated as having no tags and no links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileCache {
    /// Regular wikilink targets, in source order.
    #[serde(default)]
    pub links: Vec<String>,
    /// Embed targets (`![[...]]`), in source order.
    #[serde(default)]
    pub embeds: Vec<String>,
    /// Link values declared in frontmatter fields.
    #[serde(default)]
    pub frontmatter_links: Vec<String>,
    /// Inline tags without the leading `#`, not hierarchy-expanded.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Parsed frontmatter properties, if the document has a frontmatter block.
    #[serde(default)]
    pub frontmatter: Option<serde_json::Map<String, Value>>,
}

impl FileCache {
    /// All raw link keys of this document in source order: links, then
    /// embeds, then frontmatter links. Not deduplicated.
    pub fn reference_keys(&self) -> Vec<&str> {
        self.links
            .iter()
            .chain(self.embeds.iter())
            .chain(self.frontmatter_links.iter())
            .map(String::as_str)
            .collect()
    }

    /// Whether the cache carries any link-like references.
    pub fn has_references(&self) -> bool {
        !self.links.is_empty() || !self.embeds.is_empty() || !self.frontmatter_links.is_empty()
    }
}
