//! Collaborator traits for the discovery engine
//!
//! The engine never touches a concrete vault. It reads link topology from a
//! [`MetadataIndex`] and performs document I/O through a [`VaultStore`], so
//! discovery is testable against the in-memory vault and portable across
//! storage backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::cache::FileCache;
use crate::error::StoreResult;

/// Kinds of documents the store can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain markdown notes.
    Markdown,
    /// Structured canvas documents (JSON node lists).
    Canvas,
}

/// Read-only oracle over the vault's extracted link/tag metadata.
///
/// The link maps are `BTreeMap`s on purpose: index scans must have a defined,
/// reproducible iteration order, because dedup-acceptance order decides which
/// duplicate survives a scan. Lookups are local and synchronous.
pub trait MetadataIndex: Send + Sync {
    /// Every document's successfully resolved outbound references:
    /// `source path -> (destination path -> occurrence count)`.
    fn resolved_links(&self) -> &BTreeMap<String, BTreeMap<String, usize>>;

    /// Every document's references that resolved to no existing document:
    /// `source path -> (raw link key -> occurrence count)`.
    fn unresolved_links(&self) -> &BTreeMap<String, BTreeMap<String, usize>>;

    /// Extracted metadata for one document, absent if the index has no entry.
    fn file_cache(&self, path: &str) -> Option<&FileCache>;

    /// Resolve a raw link key against the context document's location.
    /// Returns the path of the matching document, if any exists.
    fn resolve_link(&self, key: &str, context_path: &str) -> Option<String>;
}

/// Document store operations the engine needs from the vault.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Read a document's full text.
    async fn read(&self, path: &str) -> StoreResult<String>;

    /// Create a new document with the given initial text.
    async fn create(&self, path: &str, content: &str) -> StoreResult<()>;

    /// Modification time of a document. Failures are tolerated by callers:
    /// the ranker keeps entities whose stat fails, at lowest priority.
    async fn stat(&self, path: &str) -> StoreResult<DateTime<Utc>>;

    /// All document paths of the given kind, in a stable order.
    fn list(&self, kind: DocumentKind) -> Vec<String>;

    /// Whether a document exists at the given path.
    fn exists(&self, path: &str) -> bool;
}
