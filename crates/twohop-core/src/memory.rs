//! In-memory vault implementing both collaborator traits
//!
//! Backs the CLI scanner and the engine's test suites. All maps are
//! `BTreeMap`s so every scan and listing has a defined, reproducible order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::cache::FileCache;
use crate::error::{StoreError, StoreResult};
use crate::text::{display_text, strip_sub_reference};
use crate::traits::{DocumentKind, MetadataIndex, VaultStore};

#[derive(Debug, Clone)]
struct DocRecord {
    kind: DocumentKind,
    content: String,
    modified: DateTime<Utc>,
}

/// A vault held entirely in memory.
///
/// The link maps and file caches are fixed at build time; only document
/// creation mutates state, which matches the engine's single side effect.
#[derive(Default)]
pub struct InMemoryVault {
    resolved: BTreeMap<String, BTreeMap<String, usize>>,
    unresolved: BTreeMap<String, BTreeMap<String, usize>>,
    caches: BTreeMap<String, FileCache>,
    docs: RwLock<BTreeMap<String, DocRecord>>,
    fail_stat: BTreeSet<String>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a markdown document with its extracted metadata.
    pub fn add_markdown(&mut self, path: &str, cache: FileCache) {
        self.caches.insert(path.to_string(), cache);
        self.insert_doc(path, DocumentKind::Markdown, String::new());
    }

    /// Register a canvas document with its raw JSON content.
    pub fn add_canvas(&mut self, path: &str, content: &str) {
        self.insert_doc(path, DocumentKind::Canvas, content.to_string());
    }

    /// Record one resolved outbound reference `source -> dest`.
    pub fn add_resolved(&mut self, source: &str, dest: &str) {
        *self
            .resolved
            .entry(source.to_string())
            .or_default()
            .entry(dest.to_string())
            .or_insert(0) += 1;
    }

    /// Record one unresolved outbound reference `source -> raw key`.
    pub fn add_unresolved(&mut self, source: &str, key: &str) {
        *self
            .unresolved
            .entry(source.to_string())
            .or_default()
            .entry(key.to_string())
            .or_insert(0) += 1;
    }

    /// Override a document's modification time.
    pub fn set_modified(&mut self, path: &str, modified: DateTime<Utc>) {
        if let Some(record) = self.docs.get_mut().get_mut(path) {
            record.modified = modified;
        }
    }

    /// Make subsequent `stat` calls for `path` fail, for testing the
    /// ranker's retention policy.
    pub fn fail_stat_for(&mut self, path: &str) {
        self.fail_stat.insert(path.to_string());
    }

    fn insert_doc(&mut self, path: &str, kind: DocumentKind, content: String) {
        self.docs.get_mut().insert(
            path.to_string(),
            DocRecord {
                kind,
                content,
                modified: DateTime::<Utc>::UNIX_EPOCH,
            },
        );
    }
}

impl MetadataIndex for InMemoryVault {
    fn resolved_links(&self) -> &BTreeMap<String, BTreeMap<String, usize>> {
        &self.resolved
    }

    fn unresolved_links(&self) -> &BTreeMap<String, BTreeMap<String, usize>> {
        &self.unresolved
    }

    fn file_cache(&self, path: &str) -> Option<&FileCache> {
        self.caches.get(path)
    }

    fn resolve_link(&self, key: &str, _context_path: &str) -> Option<String> {
        let key = strip_sub_reference(key);
        if key.is_empty() {
            return None;
        }

        let docs = self.docs.read();
        if docs.contains_key(key) {
            return Some(key.to_string());
        }

        // Exact display text wins over a bare-stem match; within a class the
        // lexicographically first path wins, for determinism.
        let mut stem_match = None;
        for path in docs.keys() {
            let display = display_text(path);
            if display == key {
                return Some(path.clone());
            }
            if stem_match.is_none() {
                let stem = display.rsplit('/').next().unwrap_or(display.as_str());
                if stem == key {
                    stem_match = Some(path.clone());
                }
            }
        }
        stem_match
    }
}

#[async_trait]
impl VaultStore for InMemoryVault {
    async fn read(&self, path: &str) -> StoreResult<String> {
        self.docs
            .read()
            .get(path)
            .map(|record| record.content.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn create(&self, path: &str, content: &str) -> StoreResult<()> {
        let mut docs = self.docs.write();
        if docs.contains_key(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        docs.insert(
            path.to_string(),
            DocRecord {
                kind: DocumentKind::Markdown,
                content: content.to_string(),
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn stat(&self, path: &str) -> StoreResult<DateTime<Utc>> {
        if self.fail_stat.contains(path) {
            return Err(StoreError::Io(format!("stat failed for {path}")));
        }
        self.docs
            .read()
            .get(path)
            .map(|record| record.modified)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn list(&self, kind: DocumentKind) -> Vec<String> {
        self.docs
            .read()
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn exists(&self, path: &str) -> bool {
        self.docs.read().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_link_prefers_exact_path_then_display() {
        let mut vault = InMemoryVault::new();
        vault.add_markdown("notes/Rust.md", FileCache::default());
        vault.add_markdown("other/Rust.md", FileCache::default());

        assert_eq!(
            vault.resolve_link("notes/Rust.md", "ctx.md"),
            Some("notes/Rust.md".to_string())
        );
        assert_eq!(
            vault.resolve_link("notes/Rust", "ctx.md"),
            Some("notes/Rust.md".to_string())
        );
        // Bare stem: lexicographically first candidate wins
        assert_eq!(
            vault.resolve_link("Rust", "ctx.md"),
            Some("notes/Rust.md".to_string())
        );
    }

    #[test]
    fn resolve_link_strips_sub_references() {
        let mut vault = InMemoryVault::new();
        vault.add_markdown("Note.md", FileCache::default());

        assert_eq!(
            vault.resolve_link("Note#Heading", "ctx.md"),
            Some("Note.md".to_string())
        );
        assert_eq!(vault.resolve_link("Missing#^block", "ctx.md"), None);
    }

    #[tokio::test]
    async fn create_rejects_existing_paths() {
        let mut vault = InMemoryVault::new();
        vault.add_markdown("A.md", FileCache::default());

        assert!(vault.create("B.md", "").await.is_ok());
        assert!(vault.exists("B.md"));
        assert!(matches!(
            vault.create("A.md", "").await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn stat_failure_is_injectable() {
        let mut vault = InMemoryVault::new();
        vault.add_markdown("A.md", FileCache::default());
        vault.fail_stat_for("A.md");

        assert!(matches!(vault.stat("A.md").await, Err(StoreError::Io(_))));
    }

    #[test]
    fn list_is_stable_and_kind_filtered() {
        let mut vault = InMemoryVault::new();
        vault.add_markdown("b.md", FileCache::default());
        vault.add_markdown("a.md", FileCache::default());
        vault.add_canvas("Board.canvas", "{}");

        assert_eq!(vault.list(DocumentKind::Markdown), vec!["a.md", "b.md"]);
        assert_eq!(vault.list(DocumentKind::Canvas), vec!["Board.canvas"]);
    }
}
