//! Candidate ranking
//!
//! Entities are ranked by path or by modification time, ascending or
//! descending. Stat lookups are independent read-only I/O and run
//! concurrently, but the sort itself is a barrier: every stat has completed
//! and been applied before ordering is decided.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::cmp::Ordering;

use twohop_core::{FileEntity, SortOrder, VaultStore};

/// Order entities per the configured strategy.
///
/// `key_fn` yields the path the store is statted with (and the lexicographic
/// fallback key). A failed stat never drops an entity: it is kept with no
/// timestamp, which ranks at lowest priority, and falls back to the path
/// comparison against other stat failures.
pub async fn sort_entities<F>(
    store: &dyn VaultStore,
    entities: Vec<FileEntity>,
    key_fn: F,
    order: SortOrder,
) -> Vec<FileEntity>
where
    F: Fn(&FileEntity) -> &str,
{
    let stats = join_all(entities.iter().map(|entity| {
        let path = key_fn(entity).to_string();
        async move { store.stat(&path).await.ok() }
    }))
    .await;

    let mut ranked: Vec<(FileEntity, Option<DateTime<Utc>>)> =
        entities.into_iter().zip(stats).collect();
    ranked.sort_by(|(a, a_time), (b, b_time)| {
        compare(order, key_fn(a), *a_time, key_fn(b), *b_time)
    });
    ranked.into_iter().map(|(entity, _)| entity).collect()
}

/// Order bare document paths per the configured strategy. Used for the
/// no-context full listing.
pub async fn sort_paths(store: &dyn VaultStore, paths: Vec<String>, order: SortOrder) -> Vec<String> {
    let stats = join_all(paths.iter().map(|path| {
        let path = path.clone();
        async move { store.stat(&path).await.ok() }
    }))
    .await;

    let mut ranked: Vec<(String, Option<DateTime<Utc>>)> = paths.into_iter().zip(stats).collect();
    ranked.sort_by(|(a, a_time), (b, b_time)| compare(order, a, *a_time, b, *b_time));
    ranked.into_iter().map(|(path, _)| path).collect()
}

fn compare(
    order: SortOrder,
    a_key: &str,
    a_time: Option<DateTime<Utc>>,
    b_key: &str,
    b_time: Option<DateTime<Utc>>,
) -> Ordering {
    if order.by_modified_time() {
        let primary = match (a_time, b_time) {
            (Some(a), Some(b)) => {
                let by_time = a.cmp(&b);
                if order.is_descending() {
                    by_time.reverse()
                } else {
                    by_time
                }
            }
            // Missing timestamps rank last regardless of direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        primary.then_with(|| a_key.cmp(b_key))
    } else {
        let by_path = a_key.cmp(b_key);
        if order.is_descending() {
            by_path.reverse()
        } else {
            by_path
        }
    }
}

/// Hierarchy-aware ordering for group keys, used by link-groups and
/// frontmatter-groups. Keys compare component-wise on `/` segments,
/// ascending for `*-asc` orders and descending for `*-desc`. Tag groups do
/// not use this: they follow first-occurrence order in the active document.
pub fn hierarchy_cmp(a: &str, b: &str, order: SortOrder) -> Ordering {
    let by_key = a.split('/').cmp(b.split('/'));
    if order.is_descending() {
        by_key.reverse()
    } else {
        by_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use twohop_core::{FileCache, InMemoryVault};

    fn entity(path: &str) -> FileEntity {
        FileEntity::from_path(path)
    }

    fn vault_with(paths: &[&str]) -> InMemoryVault {
        let mut vault = InMemoryVault::new();
        for path in paths {
            vault.add_markdown(path, FileCache::default());
        }
        vault
    }

    #[tokio::test]
    async fn path_orders_are_lexicographic() {
        let vault = vault_with(&["B.md", "A.md", "C.md"]);
        let entities = vec![entity("B.md"), entity("A.md"), entity("C.md")];

        let asc = sort_entities(&vault, entities.clone(), |e| e.source_path.as_str(), SortOrder::PathAsc)
            .await;
        let paths: Vec<&str> = asc.iter().map(|e| e.source_path.as_str()).collect();
        assert_eq!(paths, vec!["A.md", "B.md", "C.md"]);

        let desc =
            sort_entities(&vault, entities, |e| e.source_path.as_str(), SortOrder::PathDesc).await;
        let paths: Vec<&str> = desc.iter().map(|e| e.source_path.as_str()).collect();
        assert_eq!(paths, vec!["C.md", "B.md", "A.md"]);
    }

    #[tokio::test]
    async fn modified_desc_puts_newest_first() {
        let mut vault = vault_with(&["old.md", "new.md", "mid.md"]);
        vault.set_modified("old.md", Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        vault.set_modified("mid.md", Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
        vault.set_modified("new.md", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let entities = vec![entity("old.md"), entity("new.md"), entity("mid.md")];
        let sorted =
            sort_entities(&vault, entities, |e| e.source_path.as_str(), SortOrder::ModifiedDesc).await;
        let paths: Vec<&str> = sorted.iter().map(|e| e.source_path.as_str()).collect();
        assert_eq!(paths, vec!["new.md", "mid.md", "old.md"]);
    }

    #[tokio::test]
    async fn stat_failure_keeps_entity_at_lowest_priority() {
        let mut vault = vault_with(&["a.md", "b.md"]);
        vault.set_modified("a.md", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        vault.fail_stat_for("b.md");

        let entities = vec![entity("b.md"), entity("a.md")];
        let sorted =
            sort_entities(&vault, entities, |e| e.source_path.as_str(), SortOrder::ModifiedDesc).await;
        let paths: Vec<&str> = sorted.iter().map(|e| e.source_path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b.md"]);
    }

    #[tokio::test]
    async fn mtime_ties_fall_back_to_path() {
        let vault = vault_with(&["b.md", "a.md"]);
        let entities = vec![entity("b.md"), entity("a.md")];
        let sorted =
            sort_entities(&vault, entities, |e| e.source_path.as_str(), SortOrder::ModifiedAsc).await;
        let paths: Vec<&str> = sorted.iter().map(|e| e.source_path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b.md"]);
    }

    #[test]
    fn hierarchy_cmp_compares_components() {
        assert_eq!(
            hierarchy_cmp("a/b", "a/b/c", SortOrder::PathAsc),
            Ordering::Less
        );
        assert_eq!(
            hierarchy_cmp("a/b", "a/b/c", SortOrder::PathDesc),
            Ordering::Greater
        );
        assert_eq!(hierarchy_cmp("x", "x", SortOrder::PathAsc), Ordering::Equal);
    }
}
