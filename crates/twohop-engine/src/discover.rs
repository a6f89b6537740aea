//! The five discovery passes
//!
//! One discovery call runs new-links, back-links, link-groups, tag-groups,
//! and frontmatter-groups in that fixed order. The order is an invariant, not
//! an implementation detail: later passes observe the dedup sets mutated by
//! earlier passes, which decides which category a document surfaces under.
//!
//! Two call-scoped sets of display texts thread through the passes:
//! - the *forward* set: documents already shown as back-links or direct
//!   forward links
//! - the *global* set: documents already placed into some tag, link, or
//!   frontmatter bucket
//!
//! Both exist only for the duration of one call.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

use twohop_core::{
    extract_tags, display_text, is_excluded_path, strip_sub_reference, CanvasNodes,
    DiscoveredLinks, DocumentKind, FileCache, FileEntity, MetadataIndex, PropertyLinks,
    TwohopConfig, VaultStore,
};

use crate::buckets::build_groups;
use crate::sort::{hierarchy_cmp, sort_entities, sort_paths};

/// The association discovery engine.
///
/// Holds the read-only index, the document store, and the configuration. The
/// engine keeps no state across calls: apart from the optional auto-create
/// side effect, a call is a pure function of the index snapshot. There is no
/// cancellation primitive; a caller that switches active documents mid-call
/// must discard the stale result itself.
pub struct LinkEngine {
    index: Arc<dyn MetadataIndex>,
    store: Arc<dyn VaultStore>,
    config: TwohopConfig,
}

impl LinkEngine {
    pub fn new(
        index: Arc<dyn MetadataIndex>,
        store: Arc<dyn VaultStore>,
        config: TwohopConfig,
    ) -> Self {
        Self {
            index,
            store,
            config,
        }
    }

    /// Run one discovery call for the given active document.
    ///
    /// With no active document the engine degrades to a full sorted listing
    /// of non-excluded markdown documents, returned through `backward_links`,
    /// with every association bucket empty.
    pub async fn discover(&self, active: Option<&str>) -> DiscoveredLinks {
        let Some(active) = active else {
            return self.all_documents_listing().await;
        };

        let active_cache = self.index.file_cache(active).cloned();

        let (mut new_links, pending_creates) =
            self.collect_new_links(active, active_cache.as_ref()).await;

        let mut forward_seen: HashSet<String> = HashSet::new();
        let backward_links = self
            .collect_back_links(active, active_cache.as_ref(), &forward_seen)
            .await;
        forward_seen.extend(backward_links.iter().map(|e| e.link_text.clone()));

        let mut global_seen: HashSet<String> = HashSet::new();

        let mut tag_links = self
            .collect_link_groups(active, active_cache.as_ref(), &forward_seen, &mut global_seen)
            .await;
        tag_links.extend(
            self.collect_tag_groups(active, active_cache.as_ref(), &forward_seen, &mut global_seen)
                .await,
        );

        let frontmatter_links = self
            .collect_frontmatter_groups(
                active,
                active_cache.as_ref(),
                &forward_seen,
                &mut global_seen,
            )
            .await;

        // Materialize multi-referenced unresolved keys only after every pass
        // has run, so the side effect never feeds back into this call. A
        // failed creation is logged and the reference falls back to the
        // report; it is never silently dropped.
        for (path, key) in pending_creates {
            if let Err(err) = self.store.create(&path, "").await {
                warn!("auto-create of {path} failed: {err}");
                new_links.push(FileEntity::new(active, key));
            }
        }

        DiscoveredLinks {
            new_links,
            backward_links,
            tag_links,
            frontmatter_links,
        }
    }

    /// Degraded no-context mode: every non-excluded markdown document,
    /// sorted per configuration.
    async fn all_documents_listing(&self) -> DiscoveredLinks {
        let paths: Vec<String> = self
            .store
            .list(DocumentKind::Markdown)
            .into_iter()
            .filter(|path| !self.excluded(path))
            .collect();
        let sorted = sort_paths(self.store.as_ref(), paths, self.config.sort_order).await;

        DiscoveredLinks {
            backward_links: sorted.iter().map(|path| FileEntity::from_path(path)).collect(),
            ..Default::default()
        }
    }

    /// Pass 1: references of the active document that resolve to no
    /// existing document, plus hierarchical tags without a matching
    /// document.
    ///
    /// An unresolved key that enough *other* documents also reference is
    /// queued for creation instead of reported, when auto-creation is
    /// enabled. The returned pairs are `(path to create, original key)`;
    /// the caller performs the creations after all passes complete.
    async fn collect_new_links(
        &self,
        active: &str,
        cache: Option<&FileCache>,
    ) -> (Vec<FileEntity>, Vec<(String, String)>) {
        let mut new_links: Vec<FileEntity> = Vec::new();
        let mut pending_creates: Vec<(String, String)> = Vec::new();

        if let Some(cache) = cache.filter(|c| c.has_references()) {
            let mut seen: HashSet<String> = HashSet::new();
            for raw in cache.reference_keys() {
                let key = strip_sub_reference(raw);
                if key.is_empty() || !seen.insert(key.to_string()) {
                    continue;
                }
                // Resolved targets are never new links; an excluded resolved
                // target is skipped entirely, neither reported nor created.
                if self.index.resolve_link(key, active).is_some() {
                    continue;
                }

                let references = self.backlinks_count(key, Some(active));
                if self.config.create_files_for_multi_linked
                    && references >= self.config.auto_create_threshold
                {
                    pending_creates.push((sibling_path(active, key), key.to_string()));
                } else {
                    new_links.push(FileEntity::new(active, key));
                }
            }
        } else if is_canvas(active) {
            // Canvas documents reference other documents through file nodes.
            // Here a missing or excluded target both count as new links.
            let nodes = self.canvas_nodes(active).await;
            let mut seen: HashSet<String> = HashSet::new();
            for file in nodes.file_paths() {
                if !seen.insert(file.to_string()) {
                    continue;
                }
                if !self.store.exists(file) || self.excluded(file) {
                    new_links.push(FileEntity::new(active, file));
                }
            }
        }

        if cache.is_some() {
            let mut seen: HashSet<String> =
                new_links.iter().map(|e| e.link_text.clone()).collect();
            for tag in extract_tags(cache, &self.config.exclude_tags) {
                if !seen.insert(tag.clone()) {
                    continue;
                }
                if self.index.resolve_link(&tag, active).is_none() {
                    new_links.push(FileEntity::new(active, tag));
                }
            }
        }

        (new_links, pending_creates)
    }

    /// Pass 2: documents directly associated with the active document, in
    /// fixed precedence: inbound resolved links, tag-as-name references,
    /// the active document's own outbound links, documents named after its
    /// tags, and canvas documents whose nodes reference it.
    async fn collect_back_links(
        &self,
        active: &str,
        cache: Option<&FileCache>,
        forward_seen: &HashSet<String>,
    ) -> Vec<FileEntity> {
        let dedup = self.config.enable_duplicate_removal;
        let mut seen_sources: HashSet<String> = HashSet::new();
        let mut entities: Vec<FileEntity> = Vec::new();

        // (a) documents whose resolved links name the active document
        for (src, dests) in self.index.resolved_links() {
            if self.excluded(src) {
                continue;
            }
            for dest in dests.keys() {
                if dest != active {
                    continue;
                }
                let link_text = display_text(src);
                if dedup && forward_seen.contains(&link_text) {
                    continue;
                }
                if seen_sources.insert(src.clone()) {
                    entities.push(FileEntity::new(src.clone(), link_text));
                }
            }
        }

        // (b) documents carrying a tag equal to the active document's name
        let active_name = display_text(active);
        for md in self.store.list(DocumentKind::Markdown) {
            if md == active || self.excluded(&md) || seen_sources.contains(&md) {
                continue;
            }
            let Some(md_cache) = self.index.file_cache(&md) else {
                continue;
            };
            let file_tags = extract_tags(Some(md_cache), &self.config.exclude_tags);
            if file_tags.iter().any(|tag| *tag == active_name) {
                let link_text = display_text(&md);
                if dedup && forward_seen.contains(&link_text) {
                    continue;
                }
                seen_sources.insert(md.clone());
                entities.push(FileEntity::new(md, link_text));
            }
        }

        if let Some(cache) = cache {
            // (c) forward links, folded into the same list
            for raw in cache.reference_keys() {
                let key = strip_sub_reference(raw);
                let Some(target) = self.index.resolve_link(key, active) else {
                    continue;
                };
                if target == active || seen_sources.contains(&target) || self.excluded(&target) {
                    continue;
                }
                seen_sources.insert(target.clone());
                let link_text = display_text(&target);
                entities.push(FileEntity::new(target, link_text));
            }

            // (d) the document (if any) named after each hierarchical tag
            for tag in extract_tags(Some(cache), &self.config.exclude_tags) {
                let Some(tag_doc) = self.index.resolve_link(&tag, active) else {
                    continue;
                };
                if tag_doc == active || seen_sources.contains(&tag_doc) || self.excluded(&tag_doc)
                {
                    continue;
                }
                let link_text = display_text(&tag_doc);
                if dedup && forward_seen.contains(&link_text) {
                    continue;
                }
                seen_sources.insert(tag_doc.clone());
                entities.push(FileEntity::new(tag_doc, link_text));
            }
        }

        // (e) canvas documents whose file nodes reference the active document
        for canvas_path in self.store.list(DocumentKind::Canvas) {
            let nodes = self.canvas_nodes(&canvas_path).await;
            if !nodes.file_paths().iter().any(|file| *file == active) {
                continue;
            }
            let link_text = display_text(&canvas_path);
            if forward_seen.contains(&link_text) || seen_sources.contains(&canvas_path) {
                continue;
            }
            seen_sources.insert(canvas_path.clone());
            entities.push(FileEntity::new(canvas_path, link_text));
        }

        sort_entities(
            self.store.as_ref(),
            entities,
            |e| e.source_path.as_str(),
            self.config.sort_order,
        )
        .await
    }

    /// Pass 3: documents that co-cite a link target of the active document,
    /// bucketed under the display name of the shared target.
    async fn collect_link_groups(
        &self,
        active: &str,
        cache: Option<&FileCache>,
        forward_seen: &HashSet<String>,
        global_seen: &mut HashSet<String>,
    ) -> Vec<PropertyLinks> {
        let targets = self.active_link_targets(active, cache).await;
        if targets.is_empty() {
            return Vec::new();
        }

        let mut buckets: BTreeMap<String, Vec<FileEntity>> = BTreeMap::new();
        for (src, dests) in self.index.resolved_links() {
            if src == active || self.excluded(src) {
                continue;
            }
            for dest in dests.keys() {
                if !targets.contains(dest) {
                    continue;
                }
                let link_text = display_text(src);
                if self.config.enable_duplicate_removal
                    && (forward_seen.contains(&link_text) || global_seen.contains(&link_text))
                {
                    continue;
                }

                let entity = FileEntity::new(active, link_text.clone());
                let bucket = buckets.entry(display_text(dest)).or_default();
                if !bucket.contains(&entity) {
                    bucket.push(entity);
                    global_seen.insert(link_text);
                }
            }
        }

        let mut groups = build_groups(
            self.store.as_ref(),
            buckets,
            "links",
            self.config.sort_order,
        )
        .await;
        groups.sort_by(|a, b| hierarchy_cmp(&a.property, &b.property, self.config.sort_order));
        groups
    }

    /// Pass 4: documents sharing a hierarchical tag with the active
    /// document, bucketed per tag. Buckets follow the first-occurrence order
    /// of the tag in the active document, not the hierarchy ordering used by
    /// the other grouping passes; ties go to the end.
    async fn collect_tag_groups(
        &self,
        active: &str,
        cache: Option<&FileCache>,
        forward_seen: &HashSet<String>,
        global_seen: &mut HashSet<String>,
    ) -> Vec<PropertyLinks> {
        let active_tags = extract_tags(cache, &self.config.exclude_tags);
        if active_tags.is_empty() {
            return Vec::new();
        }
        let active_tag_set: HashSet<&str> = active_tags.iter().map(String::as_str).collect();

        let mut buckets: BTreeMap<String, Vec<FileEntity>> = BTreeMap::new();
        for md in self.store.list(DocumentKind::Markdown) {
            if md == active || self.excluded(&md) {
                continue;
            }
            let Some(md_cache) = self.index.file_cache(&md) else {
                continue;
            };
            let link_text = display_text(&md);

            for tag in extract_tags(Some(md_cache), &self.config.exclude_tags) {
                if !active_tag_set.contains(tag.as_str()) {
                    continue;
                }
                // Bucket exists even if the candidate is deduped away; empty
                // buckets are dropped by the builder.
                let bucket = buckets.entry(tag).or_default();
                if self.config.enable_duplicate_removal
                    && (forward_seen.contains(&link_text) || global_seen.contains(&link_text))
                {
                    continue;
                }
                let entity = FileEntity::new(active, link_text.clone());
                if !bucket.contains(&entity) {
                    bucket.push(entity);
                    global_seen.insert(link_text.clone());
                }
            }
        }

        let mut groups = build_groups(
            self.store.as_ref(),
            buckets,
            "tags",
            self.config.sort_order,
        )
        .await;

        let mut first_occurrence: HashMap<&str, usize> = HashMap::new();
        for (position, tag) in active_tags.iter().enumerate() {
            first_occurrence.entry(tag.as_str()).or_insert(position);
        }
        groups.sort_by_key(|group| {
            first_occurrence
                .get(group.property.as_str())
                .copied()
                .unwrap_or(usize::MAX)
        });
        groups
    }

    /// Pass 5: documents sharing a configured frontmatter field with the
    /// active document, with hierarchical value matching from deepest to
    /// shallowest. A candidate buckets under the matched prefix of its first
    /// matching value pair.
    async fn collect_frontmatter_groups(
        &self,
        active: &str,
        cache: Option<&FileCache>,
        forward_seen: &HashSet<String>,
        global_seen: &mut HashSet<String>,
    ) -> Vec<PropertyLinks> {
        let Some(active_frontmatter) = cache.and_then(|c| c.frontmatter.as_ref()) else {
            return Vec::new();
        };

        let dedup = self.config.enable_duplicate_removal;
        let mut bucketed_paths: HashSet<String> = HashSet::new();
        let mut groups: Vec<PropertyLinks> = Vec::new();

        for field in &self.config.frontmatter_keys {
            let Some(active_values) = string_values(active_frontmatter.get(field)) else {
                continue;
            };
            if active_values.is_empty() {
                continue;
            }

            let mut buckets: BTreeMap<String, Vec<FileEntity>> = BTreeMap::new();
            for md in self.store.list(DocumentKind::Markdown) {
                if md == active || self.excluded(&md) {
                    continue;
                }
                let Some(md_cache) = self.index.file_cache(&md) else {
                    continue;
                };
                let Some(values) = md_cache
                    .frontmatter
                    .as_ref()
                    .and_then(|fm| string_values(fm.get(field)))
                else {
                    continue;
                };
                let link_text = display_text(&md);

                for active_value in &active_values {
                    let active_segments: Vec<&str> = active_value.split('/').collect();
                    for depth in (0..active_segments.len()).rev() {
                        let active_prefix = active_segments[..=depth].join("/");
                        for value in &values {
                            let segments: Vec<&str> = value.split('/').collect();
                            let take = (depth + 1).min(segments.len());
                            let prefix = segments[..take].join("/");
                            if prefix != active_prefix {
                                continue;
                            }

                            let bucket = buckets.entry(prefix).or_default();
                            if dedup
                                && (bucketed_paths.contains(&md)
                                    || forward_seen.contains(&link_text)
                                    || global_seen.contains(&link_text))
                            {
                                continue;
                            }
                            bucket.push(FileEntity::new(active, link_text.clone()));
                            bucketed_paths.insert(md.clone());
                            global_seen.insert(link_text.clone());
                        }
                    }
                }
            }

            groups.extend(
                build_groups(self.store.as_ref(), buckets, field, self.config.sort_order).await,
            );
        }

        groups.sort_by(|a, b| hierarchy_cmp(&a.property, &b.property, self.config.sort_order));
        groups
    }

    /// The active document's resolved outbound target set, from inline
    /// references and, for canvas documents, structured nodes.
    async fn active_link_targets(&self, active: &str, cache: Option<&FileCache>) -> HashSet<String> {
        let mut targets: HashSet<String> = HashSet::new();

        if let Some(cache) = cache {
            for raw in cache.reference_keys() {
                let key = strip_sub_reference(raw);
                if let Some(target) = self.index.resolve_link(key, active) {
                    if !self.excluded(&target) {
                        targets.insert(target);
                    }
                }
            }
        }

        if is_canvas(active) {
            for file in self.canvas_nodes(active).await.file_paths() {
                if self.store.exists(file) && !self.excluded(file) {
                    targets.insert(file.to_string());
                }
            }
        }

        targets
    }

    /// Count the other documents holding an unresolved reference to `key`,
    /// with sub-references stripped before comparison.
    fn backlinks_count(&self, key: &str, exclude_source: Option<&str>) -> usize {
        let mut count = 0;
        for (src, dests) in self.index.unresolved_links() {
            if exclude_source == Some(src.as_str()) {
                continue;
            }
            for dest in dests.keys() {
                if strip_sub_reference(dest) == key {
                    count += 1;
                }
            }
        }
        count
    }

    /// Read and parse a canvas document's node list. Read failures degrade
    /// to an empty node list, like malformed content.
    async fn canvas_nodes(&self, path: &str) -> CanvasNodes {
        match self.store.read(path).await {
            Ok(content) => CanvasNodes::parse(&content),
            Err(err) => {
                warn!("failed to read canvas document {path}: {err}");
                CanvasNodes::Invalid
            }
        }
    }

    fn excluded(&self, path: &str) -> bool {
        is_excluded_path(path, &self.config.exclude_paths)
    }
}

fn is_canvas(path: &str) -> bool {
    path.ends_with(".canvas")
}

/// Path for an auto-created document: next to the active document.
fn sibling_path(active: &str, key: &str) -> String {
    match active.rsplit_once('/') {
        Some((parent, _)) => format!("{parent}/{key}.md"),
        None => format!("{key}.md"),
    }
}

/// Frontmatter field value as a list of strings: a single string is a
/// one-element list, a list keeps its string elements. Any other shape means
/// the field is skipped for that document.
fn string_values(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    match value? {
        serde_json::Value::String(s) => Some(vec![s.clone()]),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_path_joins_parent_directory() {
        assert_eq!(sibling_path("notes/active.md", "idea"), "notes/idea.md");
        assert_eq!(sibling_path("active.md", "idea"), "idea.md");
    }

    #[test]
    fn string_values_accepts_string_and_list() {
        use serde_json::json;

        assert_eq!(
            string_values(Some(&json!("x/y"))),
            Some(vec!["x/y".to_string()])
        );
        assert_eq!(
            string_values(Some(&json!(["a", 3, "b"]))),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(string_values(Some(&json!(42))), None);
        assert_eq!(string_values(None), None);
    }
}
