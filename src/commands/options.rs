use std::fmt::Write as _;

use crate::options::{categories_in, DropdownGroup};

const GROUPS: [(DropdownGroup, &str); 3] = [
    (DropdownGroup::Top, "Character"),
    (DropdownGroup::Middle, "Scene"),
    (DropdownGroup::Bottom, "Finish"),
];

/// Renders the style catalog; the first line of each category is the
/// placeholder shown when nothing is picked.
pub fn render_catalog() -> String {
    let mut out = String::new();
    for (group, title) in GROUPS {
        let _ = writeln!(out, "{title}");
        for category in categories_in(group) {
            let _ = writeln!(out, "  {} [{}]", category.name, category.placeholder());
            for choice in category.choices() {
                let _ = writeln!(out, "    - {choice}");
            }
        }
    }
    out
}

pub fn run() {
    print!("{}", render_catalog());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CATALOG;

    #[test]
    fn catalog_lists_every_category_once() {
        let rendered = render_catalog();
        for category in CATALOG {
            let header = format!("  {} [", category.name);
            assert_eq!(rendered.matches(&header).count(), 1, "{}", category.name);
        }
        assert!(rendered.contains("    - Android Robot"));
        assert!(rendered.starts_with("Character\n"));
    }
}
