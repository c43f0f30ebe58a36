//! Page model.
//!
//! A [`Page`] is built from a source path and its Markdown text; callers do
//! all file I/O. The source path is relative to the input root and uses `/`
//! separators, for example `guides/02-setup.md`.

use serde::Serialize;

use crate::naming::title_from_stem;
use crate::render::{render_markdown, Heading};

/// One rendered Markdown page.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Source path relative to the input directory
    pub source: String,

    /// Output path relative to the site root (`.md` swapped for `.html`)
    pub url: String,

    /// Resolved display title
    pub title: String,

    /// Rendered HTML fragment
    pub body_html: String,

    /// Headings in document order, with unique anchor ids
    pub headings: Vec<Heading>,

    /// Plain body text for search
    pub raw_text: String,

    /// Whether the body holds diagram blocks
    pub has_diagrams: bool,
}

impl Page {
    /// Render a page from its source path and text.
    ///
    /// Title resolution: the explicit `title` if given and non-blank, then the
    /// first level-1 heading, then a title derived from the file name.
    pub fn build(source: &str, text: &str, title: Option<&str>) -> Self {
        let rendered = render_markdown(text);

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| {
                rendered
                    .headings
                    .iter()
                    .find(|h| h.level == 1 && !h.text.is_empty())
                    .map(|h| h.text.clone())
            })
            .unwrap_or_else(|| title_from_stem(file_stem(source)));

        Self {
            source: source.to_string(),
            url: output_path_for(source),
            title,
            body_html: rendered.html,
            headings: rendered.headings,
            raw_text: rendered.plain_text,
            has_diagrams: rendered.diagrams > 0,
        }
    }

    /// Directory depth of the output file below the site root.
    pub fn depth(&self) -> usize {
        self.url.matches('/').count()
    }
}

/// Map a source path to its output path: `guides/setup.md` → `guides/setup.html`.
pub fn output_path_for(source: &str) -> String {
    if let Some(stem) = source.strip_suffix(".md") {
        return format!("{stem}.html");
    }

    let (dir, name) = match source.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, source),
    };
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };

    match dir {
        Some(dir) => format!("{dir}/{stem}.html"),
        None => format!("{stem}.html"),
    }
}

fn file_stem(source: &str) -> &str {
    let name = source.rsplit('/').next().unwrap_or(source);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
