//! Discovery configuration
//!
//! Loaded from a TOML file; every field has a default so a missing file or a
//! partial file both work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Ordering strategy applied by the candidate ranker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Lexicographic on the sort key, ascending.
    #[default]
    PathAsc,
    /// Lexicographic on the sort key, descending.
    PathDesc,
    /// Oldest modification time first, path on ties.
    ModifiedAsc,
    /// Newest modification time first, path on ties.
    ModifiedDesc,
}

impl SortOrder {
    /// Whether this order ranks descending.
    pub fn is_descending(self) -> bool {
        matches!(self, Self::PathDesc | Self::ModifiedDesc)
    }

    /// Whether this order ranks by modification time.
    pub fn by_modified_time(self) -> bool {
        matches!(self, Self::ModifiedAsc | Self::ModifiedDesc)
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "path-asc" => Ok(Self::PathAsc),
            "path-desc" => Ok(Self::PathDesc),
            "mtime-asc" | "modified-asc" => Ok(Self::ModifiedAsc),
            "mtime-desc" | "modified-desc" => Ok(Self::ModifiedDesc),
            other => anyhow::bail!(
                "unknown sort order '{other}' (expected path-asc, path-desc, mtime-asc, mtime-desc)"
            ),
        }
    }
}

/// Recognized discovery options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwohopConfig {
    /// Path prefixes excluded from every pass.
    pub exclude_paths: Vec<String>,
    /// Tag exclusion patterns; a trailing `/` excludes the whole subtree.
    pub exclude_tags: Vec<String>,
    /// Frontmatter fields eligible for property grouping, in display order.
    pub frontmatter_keys: Vec<String>,
    /// Ordering strategy for entity lists.
    pub sort_order: SortOrder,
    /// Toggles all forward/global dedup checks across categories.
    pub enable_duplicate_removal: bool,
    /// Create an empty document for an unresolved reference that enough
    /// other documents also reference, instead of reporting it.
    pub create_files_for_multi_linked: bool,
    /// Minimum count of other referencing documents for auto-creation.
    pub auto_create_threshold: usize,
}

impl Default for TwohopConfig {
    fn default() -> Self {
        Self {
            exclude_paths: Vec::new(),
            exclude_tags: Vec::new(),
            frontmatter_keys: Vec::new(),
            sort_order: SortOrder::default(),
            enable_duplicate_removal: true,
            create_files_for_multi_linked: false,
            auto_create_threshold: 1,
        }
    }
}

impl TwohopConfig {
    /// Load configuration from a TOML file. A missing file yields defaults;
    /// an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
