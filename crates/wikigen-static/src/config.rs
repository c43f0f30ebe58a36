//! Site configuration document.
//!
//! The configuration is optional. When present it sets the site title and
//! language and fixes the navigation structure, either as a flat `pages` list
//! or as nested `sections`:
//!
//! ```json
//! {
//!   "title": "Payments Wiki",
//!   "lang": "en",
//!   "sections": [
//!     { "title": "Start", "pages": ["overview", { "file": "setup.md", "title": "Setup" }] },
//!     { "title": "API", "pages": ["api/auth.md"], "subsections": [] }
//!   ]
//! }
//! ```
//!
//! JSON, TOML and YAML are accepted; the format follows the file extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Config files picked up from the input directory when none is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["wiki.json", "wiki.toml", "wiki.yaml", "wiki.yml"];

/// Explicit site structure and metadata.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// Site title
    #[serde(default)]
    pub title: Option<String>,

    /// HTML language tag
    #[serde(default)]
    pub lang: Option<String>,

    /// Top-level pages, in reading order
    #[serde(default)]
    pub pages: Vec<PageRef>,

    /// Top-level sections, after `pages` in reading order
    #[serde(default)]
    pub sections: Vec<SectionConfig>,

    /// Append discovered pages the config does not list
    #[serde(default = "default_true")]
    pub auto_include: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: None,
            lang: None,
            pages: Vec::new(),
            sections: Vec::new(),
            auto_include: true,
        }
    }
}

/// A page reference: a bare path, or a path with a title override.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PageRef {
    Path(String),
    Entry {
        file: String,
        #[serde(default)]
        title: Option<String>,
    },
}

impl PageRef {
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Entry { file, .. } => file,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Entry { title, .. } => title.as_deref(),
        }
    }
}

/// A named group of pages and nested sections.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SectionConfig {
    #[serde(default = "default_section_title")]
    pub title: String,

    #[serde(default)]
    pub pages: Vec<PageRef>,

    #[serde(default, alias = "sections")]
    pub subsections: Vec<SectionConfig>,

    /// Render closed in the sidebar unless it holds the current page
    #[serde(default = "default_true")]
    pub collapsed: bool,
}

fn default_true() -> bool {
    true
}

fn default_section_title() -> String {
    "Untitled".to_string()
}

/// Serialization format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Errors loading a config document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported configuration format (expected .json, .toml, .yaml): {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl SiteConfig {
    /// Load a config document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, format).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse config text in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Find a conventionally named config file in the input directory.
    pub fn detect(input_dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| input_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Whether the config prescribes any structure.
    pub fn has_structure(&self) -> bool {
        !self.pages.is_empty() || !self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_json_sections() {
        let config = SiteConfig::parse(
            r#"{
                "title": "Wiki",
                "sections": [
                    {
                        "title": "Start",
                        "pages": ["overview", {"file": "setup.md", "title": "Setup"}],
                        "subsections": [{"title": "Deep", "pages": ["deep/a.md"]}]
                    }
                ]
            }"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.title.as_deref(), Some("Wiki"));
        assert_eq!(config.lang, None);
        assert!(config.auto_include);

        let section = &config.sections[0];
        assert_eq!(section.pages[0], PageRef::Path("overview".to_string()));
        assert_eq!(section.pages[1].path(), "setup.md");
        assert_eq!(section.pages[1].title(), Some("Setup"));
        assert_eq!(section.subsections[0].title, "Deep");
        assert!(section.collapsed);
    }

    #[test]
    fn parses_toml_flat_pages() {
        let config = SiteConfig::parse(
            r#"
title = "Docs"
lang = "de"
auto_include = false
pages = ["a.md", { file = "b.md", title = "Bee" }]
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.lang.as_deref(), Some("de"));
        assert!(!config.auto_include);
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.pages[1].title(), Some("Bee"));
    }

    #[test]
    fn parses_yaml_with_sections_alias() {
        let config = SiteConfig::parse(
            "sections:\n  - title: Top\n    collapsed: false\n    sections:\n      - title: Nested\n        pages: [x.md]\n",
            ConfigFormat::Yaml,
        )
        .unwrap();

        let top = &config.sections[0];
        assert!(!top.collapsed);
        assert_eq!(top.subsections[0].pages[0].path(), "x.md");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("wiki.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("a/wiki.TOML")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("wiki.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("wiki.ini")), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempdir().unwrap();
        let result = SiteConfig::load(&temp.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_reports_malformed_document_with_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("wiki.json");
        fs::write(&path, "{ \"pages\": [").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("wiki.json"));
    }

    #[test]
    fn detects_conventional_file_names() {
        let temp = tempdir().unwrap();
        assert_eq!(SiteConfig::detect(temp.path()), None);

        fs::write(temp.path().join("wiki.toml"), "title = \"x\"").unwrap();
        assert_eq!(
            SiteConfig::detect(temp.path()),
            Some(temp.path().join("wiki.toml"))
        );
    }
}
