//! Template engine for rendering wiki pages.

use minijinja::Environment;

/// A sidebar entry: a page link, or a section with children.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// Relative link, `None` for sections
    pub href: Option<String>,
    /// Whether this is the current page
    pub active: bool,
    /// Whether a section renders expanded
    pub open: bool,
    /// Child items of a section
    pub children: Vec<NavItem>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (2-4)
    pub level: u8,
    /// Deeper headings under this one
    pub children: Vec<TocEntry>,
}

/// One breadcrumb step.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Crumb {
    pub title: String,
    pub href: Option<String>,
}

/// A prev/next link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PageLink {
    pub title: String,
    pub href: String,
}

/// Context for rendering a page template.
///
/// Link fields hold pre-escaped relative URLs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// HTML language tag
    pub lang: String,
    /// Rendered content HTML
    pub content: String,
    /// Sidebar tree
    pub nav: Vec<NavItem>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Breadcrumb trail, ending with the current page
    pub breadcrumbs: Vec<Crumb>,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,
    /// Path from the page back to the site root (`""`, `"../"`, ...)
    pub base_prefix: String,
    /// `base_prefix` as a JavaScript string literal
    pub base_prefix_json: String,
    /// Link to the site landing page
    pub home: String,
    /// Whether to load the diagram renderer
    pub has_diagrams: bool,
    /// Diagram renderer module URL
    pub mermaid_url: String,
}

/// Context for the landing redirect.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RedirectContext {
    pub site_title: String,
    pub lang: String,
    /// Title of the target page
    pub title: String,
    /// Target URL relative to the site root
    pub target: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("page.html", PAGE_TEMPLATE)?;
        env.add_template("nav.html", NAV_TEMPLATE)?;
        env.add_template("redirect.html", REDIRECT_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a wiki page.
    pub fn render_page(&self, context: &Context) -> Result<String, minijinja::Error> {
        self.env.get_template("page.html")?.render(context)
    }

    /// Render the root redirect document.
    pub fn render_redirect(&self, context: &RedirectContext) -> Result<String, minijinja::Error> {
        self.env.get_template("redirect.html")?.render(context)
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  <link rel="stylesheet" href="{{ base_prefix|safe }}style.css">
  <script>window.WIKI = { basePrefix: {{ base_prefix_json|safe }} };</script>
  <script src="{{ base_prefix|safe }}search-index.js" defer></script>
  <script src="{{ base_prefix|safe }}search.js" defer></script>
{% if has_diagrams %}
  <script src="{{ base_prefix|safe }}lightbox.js" defer></script>
  <script type="module">
    import mermaid from '{{ mermaid_url|safe }}';
    mermaid.initialize({ startOnLoad: false });
    await mermaid.run({ querySelector: '.mermaid' });
    document.dispatchEvent(new Event('wiki:diagrams-rendered'));
  </script>
{% endif %}
</head>
<body>
  <header class="top-bar">
    <a class="top-bar-brand" href="{{ home|safe }}">{{ site_title }}</a>
    <div class="topbar-search">
      <input type="search" id="wiki-search" class="topbar-search-input" placeholder="Search docs..." autocomplete="off">
      <div id="search-results" class="search-results"></div>
    </div>
  </header>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
    {% block aside %}{% endblock %}
  </div>
{% if has_diagrams %}
  <div class="mermaid-overlay" id="mermaid-overlay">
    <div class="mermaid-overlay-content" id="mermaid-overlay-content"></div>
  </div>
{% endif %}
</body>
</html>
"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<nav class="breadcrumbs" aria-label="Breadcrumb">
{% for crumb in breadcrumbs %}
  {% if not loop.first %}<span class="breadcrumb-sep">&rsaquo;</span>{% endif %}
  {% if crumb.href %}
  <a class="breadcrumb-item breadcrumb-home" href="{{ crumb.href|safe }}">{{ crumb.title }}</a>
  {% elif loop.last %}
  <span class="breadcrumb-item breadcrumb-current">{{ crumb.title }}</span>
  {% else %}
  <span class="breadcrumb-item">{{ crumb.title }}</span>
  {% endif %}
{% endfor %}
</nav>
<article class="doc">
{{ content|safe }}
</article>
{% if prev or next %}
<nav class="page-nav">
  {% if prev %}<a class="page-nav-prev" href="{{ prev.href|safe }}" rel="prev">&larr; {{ prev.title }}</a>{% endif %}
  {% if next %}<a class="page-nav-next" href="{{ next.href|safe }}" rel="next">{{ next.title }} &rarr;</a>{% endif %}
</nav>
{% endif %}
{% endblock %}

{% block aside %}
{% if toc %}
<aside class="toc">
  <div class="toc-title">On this page</div>
  <ul>
  {% for entry in toc recursive %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
      {% if entry.children %}<ul>{{ loop(entry.children) }}</ul>{% endif %}
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}
"##;

const NAV_TEMPLATE: &str = r##"<div class="sidebar-label">Contents</div>
<ul class="nav-list">
{% for item in nav recursive %}
  {% if item.href is none %}
  <li class="nav-section">
    <details{% if item.open %} open{% endif %}>
      <summary class="nav-section-title">{{ item.title }}</summary>
      <ul class="nav-section-pages">{{ loop(item.children) }}</ul>
    </details>
  </li>
  {% else %}
  <li class="nav-item{% if item.active %} active{% endif %}"><a href="{{ item.href|safe }}"{% if item.active %} aria-current="page"{% endif %}>{{ item.title }}</a></li>
  {% endif %}
{% endfor %}
</ul>
"##;

const REDIRECT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
  <meta charset="utf-8">
  <meta http-equiv="refresh" content="0; url={{ target|safe }}">
  <link rel="canonical" href="{{ target|safe }}">
  <title>{{ site_title }}</title>
</head>
<body>
  <p><a href="{{ target|safe }}">Continue to {{ title }}</a></p>
</body>
</html>
"##;
