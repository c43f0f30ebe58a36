//! Heading anchor ids.

use std::collections::{HashMap, HashSet};

/// Anchor used when a heading has no alphanumeric characters at all.
const EMPTY_ANCHOR: &str = "section";

/// Convert heading text to a URL-fragment-safe id.
///
/// Lower-cases the text, collapses every run of non-alphanumeric characters
/// into a single hyphen and trims hyphens from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Hands out unique anchor ids for the headings of a single page.
///
/// Create one registry per render pass. Repeated headings get `-2`, `-3`, ...
/// appended in order of appearance.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    used: HashSet<String>,
    seen: HashMap<String, usize>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the anchor for the next heading with the given text.
    pub fn assign(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = EMPTY_ANCHOR.to_string();
        }

        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;

        let mut candidate = if *count == 1 {
            base.clone()
        } else {
            format!("{}-{}", base, count)
        };

        // A literal "Setup 2" heading may already own "setup-2".
        while self.used.contains(&candidate) {
            *count += 1;
            candidate = format!("{}-{}", base, count);
        }

        self.used.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("snake_case & more!"), "snake-case-more");
        assert_eq!(slugify("--Leading and trailing--"), "leading-and-trailing");
    }

    #[test]
    fn slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Überblick"), "überblick");
        assert_eq!(slugify("v2.0 Release"), "v2-0-release");
    }

    #[test]
    fn repeated_headings_get_numeric_suffixes() {
        let mut anchors = AnchorRegistry::new();
        assert_eq!(anchors.assign("Setup"), "setup");
        assert_eq!(anchors.assign("Setup"), "setup-2");
        assert_eq!(anchors.assign("Setup"), "setup-3");
    }

    #[test]
    fn suffix_skips_ids_taken_by_literal_headings() {
        let mut anchors = AnchorRegistry::new();
        assert_eq!(anchors.assign("Setup 2"), "setup-2");
        assert_eq!(anchors.assign("Setup"), "setup");
        assert_eq!(anchors.assign("Setup"), "setup-3");
    }

    #[test]
    fn symbol_only_headings_get_fallback() {
        let mut anchors = AnchorRegistry::new();
        assert_eq!(anchors.assign("!!!"), "section");
        assert_eq!(anchors.assign("???"), "section-2");
    }

    #[test]
    fn registries_are_independent() {
        let mut first = AnchorRegistry::new();
        let mut second = AnchorRegistry::new();
        assert_eq!(first.assign("Intro"), "intro");
        assert_eq!(second.assign("Intro"), "intro");
    }
}
