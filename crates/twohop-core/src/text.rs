//! Pure helpers for display text, sub-references, and path exclusion

/// Extensions whose removal yields a document's display identity.
const KNOWN_EXTENSIONS: [&str; 2] = [".md", ".canvas"];

/// Convert a vault path to its display/link identity by dropping a known
/// file extension. Unknown extensions are kept as-is.
///
/// ```
/// use twohop_core::text::display_text;
///
/// assert_eq!(display_text("notes/Rust.md"), "notes/Rust");
/// assert_eq!(display_text("Board.canvas"), "Board");
/// assert_eq!(display_text("archive.tar"), "archive.tar");
/// ```
pub fn display_text(path: &str) -> String {
    for ext in KNOWN_EXTENSIONS {
        if let Some(stem) = path.strip_suffix(ext) {
            return stem.to_string();
        }
    }
    path.to_string()
}

/// Remove a trailing block- or section-reference suffix from a raw link key.
///
/// `Note#Heading` and `Note#^block-id` both identify a location inside
/// `Note`, not a separate document.
///
/// ```
/// use twohop_core::text::strip_sub_reference;
///
/// assert_eq!(strip_sub_reference("Note#Heading"), "Note");
/// assert_eq!(strip_sub_reference("Note#^abc123"), "Note");
/// assert_eq!(strip_sub_reference("Note"), "Note");
/// ```
pub fn strip_sub_reference(key: &str) -> &str {
    match key.find('#') {
        Some(pos) => &key[..pos],
        None => key,
    }
}

/// Whether a path falls under any of the configured exclusion prefixes.
pub fn is_excluded_path(path: &str, exclude_paths: &[String]) -> bool {
    exclude_paths
        .iter()
        .any(|prefix| !prefix.is_empty() && path.starts_with(prefix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_strips_known_extensions_only() {
        assert_eq!(display_text("a/b/Note.md"), "a/b/Note");
        assert_eq!(display_text("Board.canvas"), "Board");
        assert_eq!(display_text("data.json"), "data.json");
        assert_eq!(display_text("plain"), "plain");
    }

    #[test]
    fn strip_sub_reference_cuts_first_separator() {
        assert_eq!(strip_sub_reference("Note#Sec#Deep"), "Note");
        assert_eq!(strip_sub_reference("#orphan"), "");
        assert_eq!(strip_sub_reference("Note"), "Note");
    }

    #[test]
    fn exclusion_is_prefix_based() {
        let excludes = vec!["templates/".to_string()];
        assert!(is_excluded_path("templates/daily.md", &excludes));
        assert!(!is_excluded_path("notes/templates.md", &excludes));
        assert!(!is_excluded_path("notes/a.md", &[]));
    }

    #[test]
    fn empty_exclude_prefix_matches_nothing() {
        let excludes = vec![String::new()];
        assert!(!is_excluded_path("notes/a.md", &excludes));
    }
}
