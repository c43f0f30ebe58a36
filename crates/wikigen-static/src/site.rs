//! Resolved site model.

use rayon::prelude::*;
use tracing::{debug, info};
use wikigen_md::Page;

use crate::builder::{BuildConfig, BuildError};
use crate::config::SiteConfig;
use crate::discover::{discover_sources, SourceFile};
use crate::nav::{configured_tree, discover_tree, NavError, NavTree, PageId};
use crate::search::SearchIndex;

/// Site title when neither the command line nor the config sets one.
pub const DEFAULT_TITLE: &str = "Codebase Wiki";

/// Document language when neither the command line nor the config sets one.
pub const DEFAULT_LANG: &str = "en";

/// Everything needed to emit the site: pages, navigation and search index.
///
/// A `Site` is immutable once built. Page ids index [`Site::pages`].
#[derive(Debug, Clone)]
pub struct Site {
    pub title: String,
    pub lang: String,
    pages: Vec<Page>,
    nav: NavTree,
    search: SearchIndex,
}

impl Site {
    /// Read the input directory and resolve the site.
    ///
    /// No output is written; every input and reference error surfaces here.
    pub fn load(config: &BuildConfig) -> Result<Self, BuildError> {
        let sources = discover_sources(&config.input_dir)?;
        if sources.is_empty() {
            return Err(BuildError::NoPages(config.input_dir.clone()));
        }
        info!(
            "Found {} pages in {}",
            sources.len(),
            config.input_dir.display()
        );

        let config_path = match &config.config_path {
            Some(path) => Some(path.clone()),
            None => SiteConfig::detect(&config.input_dir),
        };
        let site_config = match config_path {
            Some(path) => {
                info!("Using configuration {}", path.display());
                Some(SiteConfig::load(&path)?)
            }
            None => None,
        };

        let title = config
            .title
            .clone()
            .or_else(|| site_config.as_ref().and_then(|c| c.title.clone()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let lang = config
            .lang
            .clone()
            .or_else(|| site_config.as_ref().and_then(|c| c.lang.clone()))
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Self::from_sources(sources, site_config.as_ref(), title, lang).map_err(BuildError::from)
    }

    /// Resolve a site from sources already in memory.
    ///
    /// A config with `pages` or `sections` fixes the navigation; otherwise it
    /// follows the directory layout.
    pub fn from_sources(
        sources: Vec<SourceFile>,
        config: Option<&SiteConfig>,
        title: String,
        lang: String,
    ) -> Result<Self, NavError> {
        let paths: Vec<&str> = sources.iter().map(|s| s.path.as_str()).collect();

        let (root, titles) = match config.filter(|c| c.has_structure()) {
            Some(config) => {
                debug!("Navigation from configuration");
                let tree = configured_tree(&title, config, &paths)?;
                (tree.root, tree.titles)
            }
            None => {
                debug!("Navigation from directory layout");
                (discover_tree(&title, &paths), vec![None; paths.len()])
            }
        };
        let nav = NavTree::new(root, &paths)?;

        let pages: Vec<Page> = sources
            .par_iter()
            .zip(titles.par_iter())
            .map(|(source, title)| Page::build(&source.path, &source.text, title.as_deref()))
            .collect();

        let search = SearchIndex::build(nav.reading_order().iter().map(|&id| &pages[id]));

        Ok(Self {
            title,
            lang,
            pages,
            nav,
            search,
        })
    }

    /// Pages in discovery order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id]
    }

    pub fn nav(&self) -> &NavTree {
        &self.nav
    }

    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    /// Pages in reading order.
    pub fn reading_order(&self) -> impl Iterator<Item = &Page> + '_ {
        self.nav.reading_order().iter().map(|&id| &self.pages[id])
    }

    /// Section titles from the root down, followed by the page title.
    pub fn breadcrumb(&self, id: PageId) -> Vec<&str> {
        self.nav
            .trail(id)
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.pages[id].title.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn sources(files: &[(&str, &str)]) -> Vec<SourceFile> {
        files
            .iter()
            .map(|(path, text)| SourceFile {
                path: path.to_string(),
                text: text.to_string(),
            })
            .collect()
    }

    fn titles(site: &Site) -> Vec<&str> {
        site.reading_order().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn discovery_mode_follows_layout() {
        let site = Site::from_sources(
            sources(&[
                ("10-intro.md", "# Intro"),
                ("1-overview.md", "# Overview"),
                ("api/auth.md", "# Auth"),
                ("2-setup.md", "# Setup"),
            ]),
            None,
            "Wiki".to_string(),
            "en".to_string(),
        )
        .unwrap();

        assert_eq!(titles(&site), vec!["Overview", "Setup", "Intro", "Auth"]);
        assert_eq!(site.breadcrumb(2), vec!["Wiki", "API", "Auth"]);
        assert_eq!(site.search().entries().len(), 4);
        assert_eq!(site.search().entries()[0].title, "Overview");
    }

    #[test]
    fn config_mode_orders_and_titles_pages() {
        let config = SiteConfig::parse(
            r#"{
                "sections": [
                    {"title": "Start", "pages": [{"file": "b.md", "title": "Bee"}, "a"]}
                ]
            }"#,
            ConfigFormat::Json,
        )
        .unwrap();

        let site = Site::from_sources(
            sources(&[("a.md", "# A"), ("b.md", "# B"), ("c.md", "# C")]),
            Some(&config),
            "Wiki".to_string(),
            "en".to_string(),
        )
        .unwrap();

        assert_eq!(titles(&site), vec!["Bee", "A", "C"]);
        assert_eq!(site.breadcrumb(1), vec!["Wiki", "Start", "Bee"]);
    }

    #[test]
    fn config_without_structure_uses_layout() {
        let config = SiteConfig {
            title: Some("Named".to_string()),
            ..Default::default()
        };

        let site = Site::from_sources(
            sources(&[("b.md", "# B"), ("a.md", "# A")]),
            Some(&config),
            "Wiki".to_string(),
            "en".to_string(),
        )
        .unwrap();

        assert_eq!(titles(&site), vec!["A", "B"]);
    }

    #[test]
    fn unresolved_reference_fails() {
        let config = SiteConfig::parse(r#"{"pages": ["ghost.md"]}"#, ConfigFormat::Json).unwrap();
        let err = Site::from_sources(
            sources(&[("a.md", "# A")]),
            Some(&config),
            "Wiki".to_string(),
            "en".to_string(),
        )
        .unwrap_err();

        assert!(matches!(err, NavError::Unresolved { .. }));
    }

    #[test]
    fn load_applies_title_precedence() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.md"), "# A").unwrap();
        fs::write(
            temp.path().join("wiki.json"),
            r#"{"title": "From Config", "lang": "fr"}"#,
        )
        .unwrap();

        let mut config = BuildConfig {
            input_dir: temp.path().to_path_buf(),
            output_dir: temp.path().join("out"),
            ..Default::default()
        };

        let site = Site::load(&config).unwrap();
        assert_eq!(site.title, "From Config");
        assert_eq!(site.lang, "fr");

        config.title = Some("From Flag".to_string());
        let site = Site::load(&config).unwrap();
        assert_eq!(site.title, "From Flag");
        assert_eq!(site.lang, "fr");
    }

    #[test]
    fn load_defaults_without_config() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.md"), "# A").unwrap();

        let site = Site::load(&BuildConfig {
            input_dir: temp.path().to_path_buf(),
            output_dir: temp.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(site.title, DEFAULT_TITLE);
        assert_eq!(site.lang, DEFAULT_LANG);
    }

    #[test]
    fn load_rejects_empty_input() {
        let temp = tempdir().unwrap();
        let err = Site::load(&BuildConfig {
            input_dir: temp.path().to_path_buf(),
            output_dir: temp.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, BuildError::NoPages(_)));
    }
}
