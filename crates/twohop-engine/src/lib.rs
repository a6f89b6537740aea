//! Association discovery engine
//!
//! Walks a pre-built link/tag index and assembles, for one active document,
//! the documents reachable within two hops of association: unresolved
//! references, back-links, shared-link groups, shared-tag groups, and
//! shared-frontmatter-property groups. Five passes run in a fixed order and
//! feed two call-scoped dedup sets, so no document is surfaced twice across
//! categories.

pub mod buckets;
pub mod discover;
pub mod sort;

pub use buckets::build_groups;
pub use discover::LinkEngine;
pub use sort::{hierarchy_cmp, sort_entities, sort_paths};
