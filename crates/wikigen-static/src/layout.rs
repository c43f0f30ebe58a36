//! Per-page layout: sidebar, breadcrumbs, table of contents and prev/next
//! links, with every link relative to the page being rendered.

use wikigen_md::render::escape_html;
use wikigen_md::{Heading, Page};

use crate::assets::MERMAID_URL;
use crate::nav::{NavEntry, PageId, Section};
use crate::site::Site;
use crate::templates::{Context, Crumb, NavItem, PageLink, RedirectContext, TocEntry};

/// Shallowest heading level listed in the table of contents.
pub const TOC_MIN_LEVEL: u8 = 2;

/// Deepest heading level listed in the table of contents.
pub const TOC_MAX_LEVEL: u8 = 4;

/// Landing page at the site root.
pub const INDEX_FILE: &str = "index.html";

/// Read-only view over a resolved site, shared by all page renders.
#[derive(Clone, Copy)]
pub struct SiteContext<'a> {
    site: &'a Site,
}

impl<'a> SiteContext<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Template context for one page.
    pub fn page_context(&self, id: PageId) -> Context {
        let site = self.site;
        let page = site.page(id);
        let base_prefix = base_prefix(page.depth());

        Context {
            title: page.title.clone(),
            site_title: site.title.clone(),
            lang: site.lang.clone(),
            content: page.body_html.clone(),
            nav: self.nav_items(site.nav().root(), id),
            toc: toc_tree(&page.headings),
            breadcrumbs: self.breadcrumbs(id),
            prev: site.nav().prev(id).map(|other| self.link(page, other)),
            next: site.nav().next(id).map(|other| self.link(page, other)),
            base_prefix_json: format!("\"{}\"", base_prefix),
            base_prefix,
            home: href(page, INDEX_FILE),
            has_diagrams: page.has_diagrams,
            mermaid_url: MERMAID_URL.to_string(),
        }
    }

    /// Template context for the root redirect, `None` if there are no pages.
    pub fn redirect_context(&self) -> Option<RedirectContext> {
        let first = self.site.page(self.site.nav().first()?);
        Some(RedirectContext {
            site_title: self.site.title.clone(),
            lang: self.site.lang.clone(),
            title: first.title.clone(),
            target: escape_html(&first.url),
        })
    }

    fn nav_items(&self, section: &Section, current: PageId) -> Vec<NavItem> {
        let from = self.site.page(current);

        section
            .entries
            .iter()
            .map(|entry| match entry {
                NavEntry::Page { id } => {
                    let page = self.site.page(*id);
                    NavItem {
                        title: page.title.clone(),
                        href: Some(href(from, &page.url)),
                        active: *id == current,
                        open: false,
                        children: Vec::new(),
                    }
                }
                NavEntry::Section(child) => NavItem {
                    title: child.title.clone(),
                    href: None,
                    active: false,
                    open: !child.collapsed || child.contains(current),
                    children: self.nav_items(child, current),
                },
            })
            .collect()
    }

    /// Root link, then enclosing sections, then the page itself.
    fn breadcrumbs(&self, id: PageId) -> Vec<Crumb> {
        let page = self.site.page(id);
        let mut trail = self.site.nav().trail(id).iter();

        let mut crumbs = Vec::new();
        if let Some(root) = trail.next() {
            crumbs.push(Crumb {
                title: root.clone(),
                href: Some(href(page, INDEX_FILE)),
            });
        }
        crumbs.extend(trail.map(|title| Crumb {
            title: title.clone(),
            href: None,
        }));
        crumbs.push(Crumb {
            title: page.title.clone(),
            href: None,
        });
        crumbs
    }

    fn link(&self, from: &Page, to: PageId) -> PageLink {
        let target = self.site.page(to);
        PageLink {
            title: target.title.clone(),
            href: href(from, &target.url),
        }
    }
}

/// Escaped relative link from one page to a root-relative path.
fn href(from: &Page, to: &str) -> String {
    escape_html(&relative_href(&from.url, to))
}

/// Prefix that leads from a page at `depth` back to the site root.
pub fn base_prefix(depth: usize) -> String {
    "../".repeat(depth)
}

/// Relative link between two root-relative, `/`-separated file paths.
///
/// `relative_href("guide/setup.html", "api/auth.html")` is `"../api/auth.html"`.
pub fn relative_href(from: &str, to: &str) -> String {
    let from_dirs: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let to_dirs = &to_parts[..to_parts.len() - 1];

    let common = from_dirs
        .iter()
        .zip(to_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = "../".repeat(from_dirs.len() - common);
    out.push_str(&to_parts[common..].join("/"));
    out
}

/// Nest the level 2-4 headings into a table of contents.
pub fn toc_tree(headings: &[Heading]) -> Vec<TocEntry> {
    let mut roots = Vec::new();
    for heading in headings
        .iter()
        .filter(|h| (TOC_MIN_LEVEL..=TOC_MAX_LEVEL).contains(&h.level))
    {
        insert(
            &mut roots,
            TocEntry {
                title: heading.text.clone(),
                id: heading.id.clone(),
                level: heading.level,
                children: Vec::new(),
            },
        );
    }
    roots
}

fn insert(list: &mut Vec<TocEntry>, entry: TocEntry) {
    match list.last_mut() {
        Some(last) if last.level < entry.level => insert(&mut last.children, entry),
        _ => list.push(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::SourceFile;
    use pretty_assertions::assert_eq;

    fn heading(level: u8, text: &str) -> Heading {
        Heading {
            level,
            text: text.to_string(),
            id: text.to_lowercase(),
        }
    }

    fn site(files: &[(&str, &str)]) -> Site {
        let sources = files
            .iter()
            .map(|(path, text)| SourceFile {
                path: path.to_string(),
                text: text.to_string(),
            })
            .collect();
        Site::from_sources(sources, None, "Wiki".to_string(), "en".to_string()).unwrap()
    }

    #[test]
    fn relative_links() {
        assert_eq!(relative_href("a.html", "b.html"), "b.html");
        assert_eq!(relative_href("a.html", "guide/b.html"), "guide/b.html");
        assert_eq!(relative_href("guide/a.html", "b.html"), "../b.html");
        assert_eq!(relative_href("guide/a.html", "guide/b.html"), "b.html");
        assert_eq!(relative_href("guide/a.html", "api/b.html"), "../api/b.html");
        assert_eq!(relative_href("a/b/c.html", "a/d.html"), "../d.html");
        assert_eq!(relative_href("a/b/c.html", "index.html"), "../../index.html");
    }

    #[test]
    fn base_prefix_per_depth() {
        assert_eq!(base_prefix(0), "");
        assert_eq!(base_prefix(2), "../../");
    }

    #[test]
    fn toc_nests_levels_two_to_four() {
        let headings = vec![
            heading(1, "Title"),
            heading(2, "Install"),
            heading(3, "Linux"),
            heading(4, "Debian"),
            heading(5, "Too deep"),
            heading(3, "Mac"),
            heading(2, "Usage"),
        ];

        let toc = toc_tree(&headings);

        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].title, "Install");
        assert_eq!(toc[0].children.len(), 2);
        assert_eq!(toc[0].children[0].children[0].title, "Debian");
        assert!(toc[0].children[0].children[0].children.is_empty());
        assert_eq!(toc[0].children[1].title, "Mac");
        assert_eq!(toc[1].title, "Usage");
    }

    #[test]
    fn toc_keeps_deeper_first_heading_at_top() {
        let toc = toc_tree(&[heading(3, "Deep"), heading(2, "Shallow")]);
        let titles: Vec<_> = toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Deep", "Shallow"]);
    }

    #[test]
    fn nested_page_context_uses_relative_links() {
        let site = site(&[
            ("home.md", "# Home"),
            ("guide/setup.md", "# Setup\n\n## Step one\n"),
        ]);
        let ctx = SiteContext::new(&site).page_context(1);

        assert_eq!(ctx.title, "Setup");
        assert_eq!(ctx.base_prefix, "../");
        assert_eq!(ctx.base_prefix_json, "\"../\"");
        assert_eq!(ctx.home, "../index.html");

        assert_eq!(ctx.nav[0].href.as_deref(), Some("../home.html"));
        assert_eq!(ctx.nav[1].title, "Guide");
        assert!(ctx.nav[1].open);
        assert!(ctx.nav[1].children[0].active);
        assert_eq!(ctx.nav[1].children[0].href.as_deref(), Some("setup.html"));

        let prev = ctx.prev.unwrap();
        assert_eq!(prev.title, "Home");
        assert_eq!(prev.href, "../home.html");
        assert!(ctx.next.is_none());

        assert_eq!(ctx.toc[0].id, "step-one");
    }

    #[test]
    fn breadcrumbs_start_at_home() {
        let site = site(&[("a.md", "# A"), ("guide/b.md", "# B")]);
        let crumbs = SiteContext::new(&site).page_context(1).breadcrumbs;

        assert_eq!(
            crumbs,
            vec![
                Crumb {
                    title: "Wiki".to_string(),
                    href: Some("../index.html".to_string()),
                },
                Crumb {
                    title: "Guide".to_string(),
                    href: None,
                },
                Crumb {
                    title: "B".to_string(),
                    href: None,
                },
            ]
        );
    }

    #[test]
    fn collapsed_sections_open_only_around_current_page() {
        let site = site(&[("a.md", "# A"), ("guide/b.md", "# B")]);
        let ctx = SiteContext::new(&site);

        assert!(!ctx.page_context(0).nav[1].open);
        assert!(ctx.page_context(1).nav[1].open);
    }

    #[test]
    fn redirect_targets_first_page() {
        let site = site(&[("guide/b.md", "# B"), ("a.md", "# A")]);
        let redirect = SiteContext::new(&site).redirect_context().unwrap();

        assert_eq!(redirect.target, "a.html");
        assert_eq!(redirect.title, "A");
    }
}
