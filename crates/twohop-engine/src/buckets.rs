//! Shared bucket builder for the grouping passes

use std::collections::BTreeMap;

use twohop_core::{FileEntity, PropertyLinks, SortOrder, VaultStore};

use crate::sort::sort_entities;

/// Wrap raw buckets as property groups.
///
/// Each bucket is sorted by the ranker on the entity's source path; buckets
/// that end up empty are dropped, so no group is ever emitted without
/// entities. The map is a `BTreeMap` so group construction order is stable;
/// callers re-impose their final ordering afterwards.
pub async fn build_groups(
    store: &dyn VaultStore,
    buckets: BTreeMap<String, Vec<FileEntity>>,
    category: &str,
    order: SortOrder,
) -> Vec<PropertyLinks> {
    let mut groups = Vec::new();
    for (property, entities) in buckets {
        let sorted = sort_entities(store, entities, |e| e.source_path.as_str(), order).await;
        if sorted.is_empty() {
            continue;
        }
        groups.push(PropertyLinks::new(property, category, sorted));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use twohop_core::{FileCache, InMemoryVault};

    #[tokio::test]
    async fn empty_buckets_are_dropped() {
        let mut vault = InMemoryVault::new();
        vault.add_markdown("a.md", FileCache::default());

        let mut buckets = BTreeMap::new();
        buckets.insert("kept".to_string(), vec![FileEntity::from_path("a.md")]);
        buckets.insert("dropped".to_string(), Vec::new());

        let groups = build_groups(&vault, buckets, "tags", SortOrder::PathAsc).await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].property, "kept");
        assert_eq!(groups[0].category, "tags");
    }

    #[tokio::test]
    async fn bucket_entities_are_sorted_by_source_path() {
        let mut vault = InMemoryVault::new();
        for path in ["b.md", "a.md", "c.md"] {
            vault.add_markdown(path, FileCache::default());
        }

        let mut buckets = BTreeMap::new();
        buckets.insert(
            "shared".to_string(),
            vec![
                FileEntity::from_path("c.md"),
                FileEntity::from_path("a.md"),
                FileEntity::from_path("b.md"),
            ],
        );

        let groups = build_groups(&vault, buckets, "links", SortOrder::PathAsc).await;
        let paths: Vec<&str> = groups[0]
            .entities
            .iter()
            .map(|e| e.source_path.as_str())
            .collect();
        assert_eq!(paths, vec!["a.md", "b.md", "c.md"]);
    }
}
