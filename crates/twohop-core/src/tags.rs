//! Hierarchical tag extraction
//!
//! A tag `a/b/c` is matchable at every level of its hierarchy: it contributes
//! `a`, `a/b`, and `a/b/c`. Frontmatter `tags` fields may be a list, a single
//! string, or a comma-separated string.

use serde_json::Value;

use crate::cache::FileCache;

/// Derive the full hierarchical tag set for one document.
///
/// Inline tags come first, then frontmatter tags, both in source order. Each
/// tag is expanded into its hierarchical prefix chain before exclusion
/// patterns are applied. Duplicates are kept; callers dedup as needed.
/// An absent cache yields an empty set.
///
/// Exclusion patterns: a pattern ending in `/` excludes that prefix (without
/// the trailing separator) and everything nested under it; any other pattern
/// excludes only an exact match.
pub fn extract_tags(cache: Option<&FileCache>, exclude_tags: &[String]) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(cache) = cache {
        for tag in &cache.tags {
            expand_hierarchy(tag.trim_start_matches('#'), &mut tags);
        }

        if let Some(frontmatter) = &cache.frontmatter {
            match frontmatter.get("tags") {
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Value::String(tag) = item {
                            expand_hierarchy(tag, &mut tags);
                        }
                    }
                }
                Some(Value::String(raw)) => {
                    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                        expand_hierarchy(tag, &mut tags);
                    }
                }
                _ => {}
            }
        }
    }

    tags.retain(|tag| !is_excluded_tag(tag, exclude_tags));
    tags
}

/// Push every hierarchical prefix of `tag` onto `out`: `a/b/c` pushes `a`,
/// `a/b`, `a/b/c`.
fn expand_hierarchy(tag: &str, out: &mut Vec<String>) {
    if tag.is_empty() {
        return;
    }
    let segments: Vec<&str> = tag.split('/').collect();
    for depth in 1..=segments.len() {
        out.push(segments[..depth].join("/"));
    }
}

fn is_excluded_tag(tag: &str, exclude_tags: &[String]) -> bool {
    for pattern in exclude_tags {
        if let Some(prefix) = pattern.strip_suffix('/') {
            if tag == prefix || tag.starts_with(pattern.as_str()) {
                return true;
            }
        } else if tag == pattern {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(tags: &[&str], frontmatter_tags: Option<Value>) -> FileCache {
        let mut cache = FileCache {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        if let Some(value) = frontmatter_tags {
            let mut map = serde_json::Map::new();
            map.insert("tags".to_string(), value);
            cache.frontmatter = Some(map);
        }
        cache
    }

    #[test]
    fn inline_tags_expand_hierarchy() {
        let cache = cache_with(&["a/b/c"], None);
        assert_eq!(extract_tags(Some(&cache), &[]), vec!["a", "a/b", "a/b/c"]);
    }

    #[test]
    fn inline_tags_precede_frontmatter_tags() {
        let cache = cache_with(&["inline"], Some(Value::String("front".into())));
        assert_eq!(extract_tags(Some(&cache), &[]), vec!["inline", "front"]);
    }

    #[test]
    fn frontmatter_tags_accept_list_and_comma_string() {
        let list = cache_with(
            &[],
            Some(Value::Array(vec![
                Value::String("x/y".into()),
                Value::Number(7.into()),
            ])),
        );
        assert_eq!(extract_tags(Some(&list), &[]), vec!["x", "x/y"]);

        let csv = cache_with(&[], Some(Value::String("one, two/three".into())));
        assert_eq!(
            extract_tags(Some(&csv), &[]),
            vec!["one", "two", "two/three"]
        );
    }

    #[test]
    fn subtree_exclusion_spares_similar_prefixes() {
        let cache = cache_with(&["x/y/z", "xy"], None);
        let excluded = extract_tags(Some(&cache), &["x/".to_string()]);
        assert_eq!(excluded, vec!["xy"]);
    }

    #[test]
    fn exact_exclusion_keeps_children() {
        let cache = cache_with(&["a/b"], None);
        let tags = extract_tags(Some(&cache), &["a".to_string()]);
        assert_eq!(tags, vec!["a/b"]);
    }

    #[test]
    fn missing_cache_yields_empty() {
        assert!(extract_tags(None, &[]).is_empty());
    }

    #[test]
    fn duplicates_are_preserved() {
        let cache = cache_with(&["a", "a"], None);
        assert_eq!(extract_tags(Some(&cache), &[]), vec!["a", "a"]);
    }
}
