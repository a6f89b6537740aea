//! Plain-text rendering of a discovery result

use twohop_core::{DiscoveredLinks, FileEntity, PropertyLinks};

/// Print a discovery result as indented text sections. Empty sections are
/// omitted entirely.
pub fn print_text(result: &DiscoveredLinks) {
    print_entities("New links", &result.new_links);
    print_entities("Links", &result.backward_links);
    print_groups("Two-hop links", &result.tag_links);
    print_groups("Properties", &result.frontmatter_links);
}

fn print_entities(title: &str, entities: &[FileEntity]) {
    if entities.is_empty() {
        return;
    }
    println!("{title}:");
    for entity in entities {
        println!("  {}", entity.link_text);
    }
}

fn print_groups(title: &str, groups: &[PropertyLinks]) {
    if groups.is_empty() {
        return;
    }
    println!("{title}:");
    for group in groups {
        println!("  [{}] {}", group.category, group.property);
        for entity in &group.entities {
            println!("    {}", entity.link_text);
        }
    }
}
