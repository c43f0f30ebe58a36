//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::assets::{AssetPipeline, SEARCH_INDEX_FILE};
use crate::config::ConfigError;
use crate::layout::{SiteContext, INDEX_FILE};
use crate::nav::NavError;
use crate::site::Site;
use crate::templates::TemplateEngine;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Markdown source directory
    pub input_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Explicit config document; detected in `input_dir` when unset
    pub config_path: Option<PathBuf>,

    /// Site title, overriding the config document
    pub title: Option<String>,

    /// HTML language tag, overriding the config document
    pub lang: Option<String>,

    /// Minify the stylesheet
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("wiki"),
            output_dir: PathBuf::from("wiki"),
            config_path: None,
            title: None,
            lang: None,
            minify: true,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Whether `index.html` was written as a redirect
    pub redirect: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Broad failure classes, used for process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unreadable input, malformed config
    Input,
    /// Config references that do not resolve
    Reference,
    /// Template or serialization failure
    Render,
    /// Output directory not writable
    Output,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Input directory not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("No Markdown pages found in {}", .0.display())]
    NoPages(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("Failed to render template for {page}: {message}")]
    Template { page: String, message: String },

    #[error("Failed to serialize search index: {0}")]
    SearchIndex(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput(_) | Self::NoPages(_) | Self::Read { .. } | Self::Config(_) => {
                ErrorKind::Input
            }
            Self::Nav(_) => ErrorKind::Reference,
            Self::Template { .. } | Self::SearchIndex(_) => ErrorKind::Render,
            Self::Write { .. } => ErrorKind::Output,
        }
    }
}

/// A rendered page waiting to be written.
struct RenderedPage {
    /// Output path relative to the site root
    url: String,
    html: String,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the static site.
    ///
    /// Every page is rendered in memory before the output directory is
    /// touched, so input, reference and template errors leave it as it was.
    /// Files the build does not produce are left alone.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let site = Site::load(&self.config)?;
        let templates = template_engine()?;
        let pages = render_pages(&site, &templates)?;

        let out = &self.config.output_dir;
        fs::create_dir_all(out).map_err(|source| BuildError::Write {
            path: out.clone(),
            source,
        })?;

        pages
            .par_iter()
            .map(|page| -> Result<(), BuildError> {
                write_atomic(&out.join(&page.url), &page.html)?;
                tracing::debug!("Wrote {}", page.url);
                Ok(())
            })
            .collect::<Result<Vec<()>, _>>()?;

        self.write_assets(&site)?;
        let redirect = self.write_redirect(&site, &templates)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            redirect,
            duration_ms: duration.as_millis() as u64,
            output_dir: out.clone(),
        })
    }

    /// Resolve and render the site without writing anything.
    pub fn check(&self) -> Result<Site, BuildError> {
        let site = Site::load(&self.config)?;
        let templates = template_engine()?;
        render_pages(&site, &templates)?;
        site.search().to_script()?;
        Ok(site)
    }

    /// Write the fixed assets and the search index.
    fn write_assets(&self, site: &Site) -> Result<(), BuildError> {
        let out = &self.config.output_dir;

        for (name, content) in AssetPipeline::files(self.config.minify) {
            write_atomic(&out.join(name), &content)?;
        }

        let index = site.search().to_script()?;
        write_atomic(&out.join(SEARCH_INDEX_FILE), &index)?;
        tracing::debug!(
            "Indexed {} pages for search",
            site.search().entries().len()
        );

        Ok(())
    }

    /// Write `index.html` pointing at the first page, unless a page owns it.
    fn write_redirect(&self, site: &Site, templates: &TemplateEngine) -> Result<bool, BuildError> {
        if site.pages().iter().any(|p| p.url == INDEX_FILE) {
            tracing::warn!("A source page already provides {}, skipping redirect", INDEX_FILE);
            return Ok(false);
        }

        let Some(context) = SiteContext::new(site).redirect_context() else {
            return Ok(false);
        };
        let html = templates
            .render_redirect(&context)
            .map_err(|e| BuildError::Template {
                page: INDEX_FILE.to_string(),
                message: e.to_string(),
            })?;

        write_atomic(&self.config.output_dir.join(INDEX_FILE), &html)?;
        Ok(true)
    }
}

fn template_engine() -> Result<TemplateEngine, BuildError> {
    TemplateEngine::new().map_err(|e| BuildError::Template {
        page: "built-in templates".to_string(),
        message: e.to_string(),
    })
}

fn render_pages(site: &Site, templates: &TemplateEngine) -> Result<Vec<RenderedPage>, BuildError> {
    let ctx = SiteContext::new(site);

    (0..site.pages().len())
        .into_par_iter()
        .map(|id| -> Result<RenderedPage, BuildError> {
            let page = site.page(id);
            let html = templates
                .render_page(&ctx.page_context(id))
                .map_err(|e| BuildError::Template {
                    page: page.source.clone(),
                    message: e.to_string(),
                })?;
            Ok(RenderedPage {
                url: page.url.clone(),
                html,
            })
        })
        .collect()
}

/// Write through a sibling temp file so readers never see a partial file.
fn write_atomic(path: &Path, content: &str) -> Result<(), BuildError> {
    let write_err = |source: std::io::Error| BuildError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        write_err(source)
    })
}
