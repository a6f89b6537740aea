//! Canvas document parsing
//!
//! Canvas documents are JSON with a top-level `nodes` array. The engine only
//! cares about `file` nodes, which reference other documents. Malformed
//! canvas content must never fail a discovery call, so parsing produces a
//! tagged result and `Invalid` behaves as an empty node list.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One node of a canvas document. Only `file` nodes carry a document
/// reference; other kinds (text, group, link) are ignored by discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CanvasData {
    #[serde(default)]
    nodes: Option<serde_json::Value>,
}

/// Parse result for a canvas document's node list.
#[derive(Debug, Clone)]
pub enum CanvasNodes {
    Valid(Vec<CanvasNode>),
    Invalid,
}

impl CanvasNodes {
    /// Parse canvas JSON. Never fails: malformed JSON, a non-array `nodes`
    /// field, or malformed node entries degrade to `Invalid`, which callers
    /// treat as an empty node list.
    pub fn parse(raw: &str) -> Self {
        let data: CanvasData = match serde_json::from_str(raw) {
            Ok(data) => data,
            Err(err) => {
                warn!("invalid JSON in canvas document: {err}");
                return Self::Invalid;
            }
        };

        match data.nodes {
            None => Self::Valid(Vec::new()),
            Some(serde_json::Value::Array(items)) => {
                let nodes = items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<CanvasNode>(item).ok())
                    .collect();
                Self::Valid(nodes)
            }
            Some(_) => {
                warn!("invalid structure in canvas document: nodes is not an array");
                Self::Invalid
            }
        }
    }

    /// Paths referenced by `file` nodes, in node order. Empty for `Invalid`.
    pub fn file_paths(&self) -> Vec<&str> {
        match self {
            Self::Valid(nodes) => nodes
                .iter()
                .filter(|node| node.kind == "file")
                .filter_map(|node| node.file.as_deref())
                .collect(),
            Self::Invalid => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_nodes() {
        let raw = r#"{"nodes":[
            {"type":"file","file":"notes/A.md"},
            {"type":"text","text":"hello"},
            {"type":"file","file":"notes/B.md"}
        ]}"#;

        let nodes = CanvasNodes::parse(raw);
        assert_eq!(nodes.file_paths(), vec!["notes/A.md", "notes/B.md"]);
    }

    #[test]
    fn malformed_json_degrades_to_empty() {
        let nodes = CanvasNodes::parse("{not json");
        assert!(matches!(nodes, CanvasNodes::Invalid));
        assert!(nodes.file_paths().is_empty());
    }

    #[test]
    fn non_array_nodes_degrade_to_empty() {
        let nodes = CanvasNodes::parse(r#"{"nodes":"oops"}"#);
        assert!(matches!(nodes, CanvasNodes::Invalid));
        assert!(nodes.file_paths().is_empty());
    }

    #[test]
    fn missing_nodes_is_valid_and_empty() {
        let nodes = CanvasNodes::parse("{}");
        assert!(matches!(nodes, CanvasNodes::Valid(_)));
        assert!(nodes.file_paths().is_empty());
    }
}
