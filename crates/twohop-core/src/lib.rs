//! Core types and collaborator traits for two-hop link discovery
//!
//! This crate defines the data model shared by the discovery engine and its
//! callers:
//! - Document references and association buckets ([`FileEntity`],
//!   [`PropertyLinks`], [`DiscoveredLinks`])
//! - The read-only [`MetadataIndex`] oracle and the [`VaultStore`] document
//!   store, as traits so the engine stays independent of any concrete vault
//! - Pure helpers for display text, sub-references, exclusion patterns, and
//!   hierarchical tag extraction
//! - Configuration loading and an in-memory vault used by tests and the CLI

pub mod cache;
pub mod canvas;
pub mod config;
pub mod entity;
pub mod error;
pub mod memory;
pub mod tags;
pub mod text;
pub mod traits;

pub use cache::FileCache;
pub use canvas::{CanvasNode, CanvasNodes};
pub use config::{SortOrder, TwohopConfig};
pub use entity::{DiscoveredLinks, FileEntity, PropertyLinks};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryVault;
pub use tags::extract_tags;
pub use text::{display_text, is_excluded_path, strip_sub_reference};
pub use traits::{DocumentKind, MetadataIndex, VaultStore};
