//! Vault scanner
//!
//! Builds the in-memory metadata index from a directory of markdown and
//! canvas files. This is deliberately not a full markdown parser: wikilinks,
//! embeds, inline tags, and YAML frontmatter cover what discovery needs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;
use walkdir::WalkDir;

use twohop_core::{strip_sub_reference, FileCache, InMemoryVault};

static WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\]]+)\]\]").expect("wikilink regex"));

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z][A-Za-z0-9_/-]*)").expect("tag regex"));

/// Scan a vault directory into an [`InMemoryVault`].
///
/// Paths are recorded relative to the vault root with `/` separators.
/// Hidden directories are skipped. After all caches are built, every
/// reference is resolved once to fill the resolved/unresolved link maps.
pub fn scan_vault(root: &Path) -> Result<InMemoryVault> {
    let mut vault = InMemoryVault::new();
    let mut caches: BTreeMap<String, FileCache> = BTreeMap::new();
    let mut mtimes: BTreeMap<String, DateTime<Utc>> = BTreeMap::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Some(rel) = relative_path(root, entry.path()) else {
            continue;
        };
        let is_md = rel.ends_with(".md");
        let is_canvas = rel.ends_with(".canvas");
        if !is_md && !is_canvas {
            continue;
        }

        let content = std::fs::read_to_string(entry.path())
            .with_context(|| format!("failed to read {}", entry.path().display()))?;
        if let Ok(meta) = entry.metadata() {
            if let Ok(modified) = meta.modified() {
                mtimes.insert(rel.clone(), modified.into());
            }
        }

        if is_md {
            let cache = extract_cache(&content);
            vault.add_markdown(&rel, cache.clone());
            caches.insert(rel, cache);
        } else {
            vault.add_canvas(&rel, &content);
        }
    }

    for (path, modified) in &mtimes {
        vault.set_modified(path, *modified);
    }

    // Resolution pass: every reference either lands in the resolved map or
    // the unresolved map, keyed by its stripped link key.
    let mut resolved: Vec<(String, String)> = Vec::new();
    let mut unresolved: Vec<(String, String)> = Vec::new();
    for (path, cache) in &caches {
        for raw in cache.reference_keys() {
            let key = strip_sub_reference(raw);
            if key.is_empty() {
                continue;
            }
            match twohop_core::MetadataIndex::resolve_link(&vault, key, path) {
                Some(target) => resolved.push((path.clone(), target)),
                None => unresolved.push((path.clone(), key.to_string())),
            }
        }
    }
    for (src, dest) in resolved {
        vault.add_resolved(&src, &dest);
    }
    for (src, key) in unresolved {
        vault.add_unresolved(&src, &key);
    }

    debug!("scanned {} markdown documents", caches.len());
    Ok(vault)
}

/// Extract links, tags, and frontmatter from one markdown document.
pub fn extract_cache(content: &str) -> FileCache {
    let (frontmatter_raw, body) = split_frontmatter(content);

    let mut cache = FileCache::default();

    for cap in WIKILINK_REGEX.captures_iter(body) {
        let is_embed = !cap[1].is_empty();
        let target = link_target(&cap[2]);
        if target.is_empty() {
            continue;
        }
        if is_embed {
            cache.embeds.push(target);
        } else {
            cache.links.push(target);
        }
    }

    // Tags are extracted with wikilink spans blanked out, so a sub-reference
    // like `[[Note#Heading]]` never reads as an inline `#Heading` tag.
    let without_links = WIKILINK_REGEX.replace_all(body, " ");
    for cap in TAG_REGEX.captures_iter(&without_links) {
        cache.tags.push(cap[1].to_string());
    }

    if let Some(raw) = frontmatter_raw {
        for cap in WIKILINK_REGEX.captures_iter(raw) {
            let target = link_target(&cap[2]);
            if !target.is_empty() {
                cache.frontmatter_links.push(target);
            }
        }
        if let Ok(serde_json::Value::Object(map)) =
            serde_yaml::from_str::<serde_json::Value>(raw)
        {
            cache.frontmatter = Some(map);
        }
    }

    cache
}

/// Split a leading YAML frontmatter block from the document body.
fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---\n") else {
        return (None, content);
    };
    match rest.find("\n---") {
        Some(end) => {
            let body = rest[end + 4..].trim_start_matches('\n');
            (Some(&rest[..end]), body)
        }
        None => (None, content),
    }
}

/// The target portion of a wikilink's inner text: alias stripped, trimmed.
fn link_target(inner: &str) -> String {
    inner.split('|').next().unwrap_or("").trim().to_string()
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let text = rel.to_str()?;
    Some(text.replace(std::path::MAIN_SEPARATOR, "/"))
}
