//! Navigation tree.
//!
//! The tree is built once per build, either from the config document or from
//! the input directory layout, and from then on both look the same: a root
//! [`Section`] whose entries are pages and nested sections in display order.
//!
//! The reading order used for prev/next links is the depth-first walk of that
//! tree. Every page appears exactly once in it.

use std::collections::{BTreeMap, HashMap};

use wikigen_md::compare_entry_names;
use wikigen_md::naming::section_title;

use crate::config::{PageRef, SectionConfig, SiteConfig};

/// Index of a page in the site's page list.
pub type PageId = usize;

/// Errors resolving the navigation structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("Configuration references '{reference}' but no such page exists")]
    Unresolved { reference: String },

    #[error("Configuration reference '{reference}' is ambiguous, it matches: {}", .candidates.join(", "))]
    Ambiguous {
        reference: String,
        candidates: Vec<String>,
    },

    #[error("Page '{path}' is listed more than once in the navigation")]
    Duplicate { path: String },

    #[error("Pages not listed in the configuration (auto_include is off): {}", .paths.join(", "))]
    Unlisted { paths: Vec<String> },
}

/// An entry of a section, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Page { id: PageId },
    Section(Section),
}

/// A named group of pages and nested sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Display hint: render closed unless it holds the current page
    pub collapsed: bool,
    pub entries: Vec<NavEntry>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            collapsed: true,
            entries: Vec::new(),
        }
    }

    /// Sections directly in this section.
    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.entries.iter().filter_map(|e| match e {
            NavEntry::Section(section) => Some(section),
            NavEntry::Page { .. } => None,
        })
    }

    /// Whether the page sits anywhere below this section.
    pub fn contains(&self, page: PageId) -> bool {
        self.entries.iter().any(|e| match e {
            NavEntry::Page { id } => *id == page,
            NavEntry::Section(section) => section.contains(page),
        })
    }
}

/// Resolved navigation: section tree plus the flattened reading order.
#[derive(Debug, Clone)]
pub struct NavTree {
    root: Section,
    order: Vec<PageId>,
    /// Reading-order position per page id
    positions: Vec<usize>,
    /// Section titles from the root down to each page's parent
    trails: Vec<Vec<String>>,
}

impl NavTree {
    /// Wrap a section tree, checking that each of the `sources` pages appears
    /// exactly once.
    pub fn new(root: Section, sources: &[&str]) -> Result<Self, NavError> {
        let mut order = Vec::with_capacity(sources.len());
        let mut trails: Vec<Option<Vec<String>>> = vec![None; sources.len()];
        let mut trail = Vec::new();

        flatten(&root, &mut trail, &mut order, &mut trails, sources)?;

        let unlisted: Vec<String> = trails
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_none())
            .map(|(id, _)| sources[id].to_string())
            .collect();
        if !unlisted.is_empty() {
            return Err(NavError::Unlisted { paths: unlisted });
        }

        let mut positions = vec![0; sources.len()];
        for (position, id) in order.iter().enumerate() {
            positions[*id] = position;
        }

        Ok(Self {
            root,
            order,
            positions,
            trails: trails.into_iter().map(Option::unwrap_or_default).collect(),
        })
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    /// All pages, depth-first.
    pub fn reading_order(&self) -> &[PageId] {
        &self.order
    }

    /// Position of a page in the reading order.
    pub fn order_index(&self, page: PageId) -> usize {
        self.positions[page]
    }

    pub fn prev(&self, page: PageId) -> Option<PageId> {
        let index = self.order_index(page);
        index.checked_sub(1).map(|i| self.order[i])
    }

    pub fn next(&self, page: PageId) -> Option<PageId> {
        self.order.get(self.order_index(page) + 1).copied()
    }

    pub fn first(&self) -> Option<PageId> {
        self.order.first().copied()
    }

    /// Section titles from the root to the page's parent section.
    pub fn trail(&self, page: PageId) -> &[String] {
        &self.trails[page]
    }
}

fn flatten(
    section: &Section,
    trail: &mut Vec<String>,
    order: &mut Vec<PageId>,
    trails: &mut [Option<Vec<String>>],
    sources: &[&str],
) -> Result<(), NavError> {
    trail.push(section.title.clone());

    for entry in &section.entries {
        match entry {
            NavEntry::Page { id } => {
                let slot = trails.get_mut(*id).ok_or_else(|| NavError::Unresolved {
                    reference: format!("#{id}"),
                })?;
                if slot.is_some() {
                    return Err(NavError::Duplicate {
                        path: sources[*id].to_string(),
                    });
                }
                *slot = Some(trail.clone());
                order.push(*id);
            }
            NavEntry::Section(child) => flatten(child, trail, order, trails, sources)?,
        }
    }

    trail.pop();
    Ok(())
}

/// Derive the tree from the directory layout of the source paths.
///
/// The root section holds the top-level files; every subdirectory becomes a
/// nested section titled after the directory. Files precede subdirectories
/// and both follow the numeric-prefix-aware name order.
pub fn discover_tree(root_title: &str, sources: &[&str]) -> Section {
    #[derive(Default)]
    struct Dir<'a> {
        files: Vec<(&'a str, PageId)>,
        dirs: BTreeMap<&'a str, Dir<'a>>,
    }

    fn into_section(title: String, mut dir: Dir<'_>) -> Section {
        dir.files.sort_by(|a, b| compare_entry_names(a.0, b.0));
        let mut dirs: Vec<_> = dir.dirs.into_iter().collect();
        dirs.sort_by(|a, b| compare_entry_names(a.0, b.0));

        let mut section = Section::new(title);
        section
            .entries
            .extend(dir.files.into_iter().map(|(_, id)| NavEntry::Page { id }));
        section.entries.extend(
            dirs.into_iter()
                .map(|(name, child)| NavEntry::Section(into_section(section_title(name), child))),
        );
        section
    }

    let mut root = Dir::default();
    for (id, &path) in sources.iter().enumerate() {
        let mut segments: Vec<&str> = path.split('/').collect();
        let file = segments.pop().unwrap_or(path);

        let mut dir = &mut root;
        for segment in segments {
            dir = dir.dirs.entry(segment).or_default();
        }
        dir.files.push((file, id));
    }

    into_section(root_title.to_string(), root)
}

/// Pages resolved from a config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredTree {
    pub root: Section,
    /// Title overrides from `{ file, title }` references, per page id
    pub titles: Vec<Option<String>>,
}

/// Build the tree prescribed by a config document.
///
/// Each reference resolves by exact relative path (with or without `.md`),
/// then by a unique file stem anywhere in the tree. Pages the config does
/// not mention are appended to the root when `auto_include` is set, and are
/// an error otherwise.
pub fn configured_tree(
    root_title: &str,
    config: &SiteConfig,
    sources: &[&str],
) -> Result<ConfiguredTree, NavError> {
    let mut resolver = Resolver::new(sources);
    let mut root = Section::new(root_title);
    root.collapsed = false;

    for page in &config.pages {
        let id = resolver.resolve(page)?;
        root.entries.push(NavEntry::Page { id });
    }
    for section in &config.sections {
        root.entries.push(NavEntry::Section(resolver.section(section)?));
    }

    let unlisted: Vec<PageId> = (0..sources.len())
        .filter(|id| resolver.titles[*id].is_none())
        .collect();

    if !unlisted.is_empty() {
        if !config.auto_include {
            return Err(NavError::Unlisted {
                paths: unlisted.iter().map(|id| sources[*id].to_string()).collect(),
            });
        }
        tracing::debug!("Appending {} unlisted page(s) to the root", unlisted.len());
        root.entries
            .extend(unlisted.into_iter().map(|id| NavEntry::Page { id }));
    }

    Ok(ConfiguredTree {
        root,
        titles: resolver.titles.into_iter().map(Option::flatten).collect(),
    })
}

struct Resolver<'a> {
    sources: &'a [&'a str],
    by_path: HashMap<&'a str, PageId>,
    by_stem: HashMap<&'a str, Vec<PageId>>,
    /// `Some(title override)` once a page has been claimed
    titles: Vec<Option<Option<String>>>,
}

impl<'a> Resolver<'a> {
    fn new(sources: &'a [&'a str]) -> Self {
        let mut by_path = HashMap::new();
        let mut by_stem: HashMap<&str, Vec<PageId>> = HashMap::new();

        for (id, &path) in sources.iter().enumerate() {
            by_path.insert(path, id);
            let name = path.rsplit('/').next().unwrap_or(path);
            let stem = name.strip_suffix(".md").unwrap_or(name);
            by_stem.entry(stem).or_default().push(id);
        }

        Self {
            sources,
            by_path,
            by_stem,
            titles: vec![None; sources.len()],
        }
    }

    fn section(&mut self, config: &SectionConfig) -> Result<Section, NavError> {
        let mut section = Section::new(config.title.clone());
        section.collapsed = config.collapsed;

        for page in &config.pages {
            let id = self.resolve(page)?;
            section.entries.push(NavEntry::Page { id });
        }
        for sub in &config.subsections {
            section.entries.push(NavEntry::Section(self.section(sub)?));
        }

        Ok(section)
    }

    fn resolve(&mut self, page: &PageRef) -> Result<PageId, NavError> {
        let id = self.lookup(page.path())?;

        if self.titles[id].is_some() {
            return Err(NavError::Duplicate {
                path: self.sources[id].to_string(),
            });
        }
        self.titles[id] = Some(page.title().map(str::to_string));

        Ok(id)
    }

    fn lookup(&self, reference: &str) -> Result<PageId, NavError> {
        let normalized = reference.trim().replace('\\', "/");
        let normalized = normalized.trim_start_matches("./");

        if let Some(id) = self.by_path.get(normalized) {
            return Ok(*id);
        }
        if let Some(id) = self.by_path.get(format!("{normalized}.md").as_str()) {
            return Ok(*id);
        }

        let name = normalized.rsplit('/').next().unwrap_or(normalized);
        let stem = name.strip_suffix(".md").unwrap_or(name);
        match self.by_stem.get(stem).map(Vec::as_slice) {
            Some([id]) if !normalized.contains('/') => Ok(*id),
            Some(ids) if ids.len() > 1 && !normalized.contains('/') => {
                Err(NavError::Ambiguous {
                    reference: reference.to_string(),
                    candidates: ids.iter().map(|id| self.sources[*id].to_string()).collect(),
                })
            }
            _ => Err(NavError::Unresolved {
                reference: reference.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(id: PageId) -> NavEntry {
        NavEntry::Page { id }
    }

    #[test]
    fn discovery_sorts_numeric_prefixes() {
        let sources = ["10-intro.md", "2-setup.md", "1-overview.md"];
        let root = discover_tree("Wiki", &sources);
        let tree = NavTree::new(root, &sources).unwrap();

        let order: Vec<_> = tree.reading_order().iter().map(|id| sources[*id]).collect();
        assert_eq!(order, vec!["1-overview.md", "2-setup.md", "10-intro.md"]);
    }

    #[test]
    fn discovery_nests_directories() {
        let sources = [
            "index.md",
            "api/auth.md",
            "api/v2/tokens.md",
            "02-guides/b.md",
            "02-guides/a.md",
        ];
        let root = discover_tree("Wiki", &sources);

        assert_eq!(root.title, "Wiki");
        assert_eq!(root.entries[0], page(0));

        let sections: Vec<_> = root.sections().map(|s| s.title.as_str()).collect();
        assert_eq!(sections, vec!["Guides", "API"]);

        let guides = root.sections().next().unwrap();
        assert_eq!(guides.entries, vec![page(4), page(3)]);

        let api = root.sections().nth(1).unwrap();
        assert_eq!(api.entries[0], page(1));
        assert_eq!(api.sections().next().unwrap().title, "V2");
    }

    #[test]
    fn breadcrumbs_and_neighbours() {
        let sources = ["a.md", "guide/b.md", "guide/details/c.md"];
        let tree = NavTree::new(discover_tree("Wiki", &sources), &sources).unwrap();

        assert_eq!(tree.trail(0), &["Wiki".to_string()]);
        assert_eq!(tree.trail(2), &["Wiki", "Guide", "Details"].map(String::from));

        assert_eq!(tree.prev(0), None);
        assert_eq!(tree.next(0), Some(1));
        assert_eq!(tree.prev(1), Some(0));
        assert_eq!(tree.next(1), Some(2));
        assert_eq!(tree.next(2), None);
        assert_eq!(tree.first(), Some(0));
    }

    #[test]
    fn config_order_overrides_filesystem_order() {
        let sources = ["x.md", "y.md", "z.md"];
        let config = SiteConfig {
            pages: vec![
                PageRef::Path("z".to_string()),
                PageRef::Path("x.md".to_string()),
                PageRef::Entry {
                    file: "y.md".to_string(),
                    title: Some("Why".to_string()),
                },
            ],
            ..Default::default()
        };

        let configured = configured_tree("Wiki", &config, &sources).unwrap();
        assert_eq!(configured.titles, vec![None, Some("Why".to_string()), None]);

        let tree = NavTree::new(configured.root, &sources).unwrap();
        assert_eq!(tree.reading_order(), &[2, 0, 1]);
    }

    #[test]
    fn config_sections_nest_depth_first() {
        let sources = ["overview.md", "api/auth.md", "api/users.md", "ops.md"];
        let config = SiteConfig {
            sections: vec![
                SectionConfig {
                    title: "Start".to_string(),
                    pages: vec![PageRef::Path("overview".to_string())],
                    subsections: vec![SectionConfig {
                        title: "API".to_string(),
                        pages: vec![
                            PageRef::Path("api/users.md".to_string()),
                            PageRef::Path("auth".to_string()),
                        ],
                        subsections: vec![],
                        collapsed: false,
                    }],
                    collapsed: true,
                },
                SectionConfig {
                    title: "Ops".to_string(),
                    pages: vec![PageRef::Path("ops.md".to_string())],
                    subsections: vec![],
                    collapsed: true,
                },
            ],
            ..Default::default()
        };

        let configured = configured_tree("Wiki", &config, &sources).unwrap();
        let tree = NavTree::new(configured.root, &sources).unwrap();

        assert_eq!(tree.reading_order(), &[0, 2, 1, 3]);
        assert_eq!(tree.trail(1), &["Wiki", "Start", "API"].map(String::from));
        assert!(!tree.root().sections().next().unwrap().sections().next().unwrap().collapsed);
    }

    #[test]
    fn unresolved_reference_names_the_path() {
        let sources = ["a.md"];
        let config = SiteConfig {
            pages: vec![PageRef::Path("missing/page.md".to_string())],
            ..Default::default()
        };

        let err = configured_tree("Wiki", &config, &sources).unwrap_err();
        assert_eq!(
            err,
            NavError::Unresolved {
                reference: "missing/page.md".to_string()
            }
        );
        assert!(err.to_string().contains("missing/page.md"));
    }

    #[test]
    fn path_qualified_reference_does_not_fall_back_to_stem() {
        let sources = ["x.md"];
        let config = SiteConfig {
            pages: vec![PageRef::Path("old/x.md".to_string())],
            ..Default::default()
        };

        let err = configured_tree("Wiki", &config, &sources).unwrap_err();
        assert_eq!(
            err,
            NavError::Unresolved {
                reference: "old/x.md".to_string()
            }
        );

        let bare = SiteConfig {
            pages: vec![PageRef::Path("x".to_string())],
            ..Default::default()
        };
        assert!(configured_tree("Wiki", &bare, &sources).is_ok());
    }

    #[test]
    fn duplicate_reference_is_rejected() {
        let sources = ["a.md", "b.md"];
        let config = SiteConfig {
            pages: vec![PageRef::Path("a".to_string())],
            sections: vec![SectionConfig {
                title: "Again".to_string(),
                pages: vec![PageRef::Path("a.md".to_string())],
                subsections: vec![],
                collapsed: true,
            }],
            ..Default::default()
        };

        let err = configured_tree("Wiki", &config, &sources).unwrap_err();
        assert_eq!(
            err,
            NavError::Duplicate {
                path: "a.md".to_string()
            }
        );
    }

    #[test]
    fn ambiguous_stem_is_rejected() {
        let sources = ["api/index.md", "guide/index.md"];
        let config = SiteConfig {
            pages: vec![PageRef::Path("index".to_string())],
            ..Default::default()
        };

        let err = configured_tree("Wiki", &config, &sources).unwrap_err();
        assert!(matches!(err, NavError::Ambiguous { ref candidates, .. } if candidates.len() == 2));
    }

    #[test]
    fn unlisted_pages_are_appended_with_auto_include() {
        let sources = ["a.md", "b.md", "c.md"];
        let config = SiteConfig {
            pages: vec![PageRef::Path("c".to_string())],
            ..Default::default()
        };

        let configured = configured_tree("Wiki", &config, &sources).unwrap();
        assert_eq!(configured.root.entries, vec![page(2), page(0), page(1)]);
    }

    #[test]
    fn unlisted_pages_fail_without_auto_include() {
        let sources = ["a.md", "b.md"];
        let config = SiteConfig {
            pages: vec![PageRef::Path("a".to_string())],
            auto_include: false,
            ..Default::default()
        };

        let err = configured_tree("Wiki", &config, &sources).unwrap_err();
        assert_eq!(
            err,
            NavError::Unlisted {
                paths: vec!["b.md".to_string()]
            }
        );
    }

    #[test]
    fn tree_rejects_pages_listed_twice() {
        let sources = ["a.md"];
        let mut root = Section::new("Wiki");
        root.entries = vec![page(0), page(0)];

        let err = NavTree::new(root, &sources).unwrap_err();
        assert!(matches!(err, NavError::Duplicate { .. }));
    }

    #[test]
    fn tree_rejects_missing_pages() {
        let sources = ["a.md", "b.md"];
        let mut root = Section::new("Wiki");
        root.entries = vec![page(1)];

        let err = NavTree::new(root, &sources).unwrap_err();
        assert_eq!(
            err,
            NavError::Unlisted {
                paths: vec!["a.md".to_string()]
            }
        );
    }

    #[test]
    fn contains_searches_nested_sections() {
        let sources = ["a.md", "x/y/b.md"];
        let root = discover_tree("Wiki", &sources);
        let x = root.sections().next().unwrap();
        assert!(x.contains(1));
        assert!(!x.contains(0));
        assert!(root.contains(1));
    }
}
