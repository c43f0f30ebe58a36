//! Static assets shipped with every site: stylesheet, search and diagram
//! lightbox scripts.

/// Stylesheet file name at the site root.
pub const STYLE_FILE: &str = "style.css";

/// Search script file name at the site root.
pub const SEARCH_SCRIPT_FILE: &str = "search.js";

/// Diagram lightbox script file name at the site root.
pub const LIGHTBOX_SCRIPT_FILE: &str = "lightbox.js";

/// Generated search index file name at the site root.
pub const SEARCH_INDEX_FILE: &str = "search-index.js";

/// Diagram renderer loaded by pages that contain diagrams.
pub const MERMAID_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The fixed asset files as `(file name, contents)`.
    pub fn files(minify: bool) -> Vec<(&'static str, String)> {
        let css = DEFAULT_CSS.to_string();
        let css = if minify {
            Self::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Keeping unminified stylesheet: {}", e);
                css
            })
        } else {
            css
        };

        vec![
            (STYLE_FILE, css),
            (SEARCH_SCRIPT_FILE, SEARCH_JS.to_string()),
            (LIGHTBOX_SCRIPT_FILE, LIGHTBOX_JS.to_string()),
        ]
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* Wiki theme */

:root {
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --code-background: #f6f8fa;
  --top-bar-height: 52px;
  --sidebar-width: 280px;
  --toc-width: 220px;
  --content-max-width: 860px;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, "Segoe UI", Helvetica, Arial, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: var(--primary);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}

/* Top bar */
.top-bar {
  position: sticky;
  top: 0;
  z-index: 10;
  display: flex;
  align-items: center;
  gap: 1.5rem;
  height: var(--top-bar-height);
  padding: 0 1.5rem;
  background: var(--background);
  border-bottom: 1px solid var(--border);
}

.top-bar-brand {
  font-weight: 600;
  color: var(--foreground);
}

.topbar-search {
  position: relative;
  flex: 1;
  max-width: 420px;
  margin-left: auto;
}

.topbar-search-input {
  width: 100%;
  padding: 0.4rem 0.75rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  font: inherit;
  background: var(--muted);
}

.search-results {
  display: none;
  position: absolute;
  top: calc(100% + 4px);
  left: 0;
  right: 0;
  max-height: 70vh;
  overflow-y: auto;
  background: var(--background);
  border: 1px solid var(--border);
  border-radius: 6px;
  box-shadow: 0 8px 24px rgba(0, 0, 0, 0.12);
}

.search-results.visible {
  display: block;
}

.search-result {
  display: block;
  padding: 0.6rem 0.8rem;
  border-bottom: 1px solid var(--border);
  color: var(--foreground);
}

.search-result:last-child {
  border-bottom: none;
}

.search-result:hover {
  background: var(--muted);
  text-decoration: none;
}

.search-result-title {
  font-weight: 600;
}

.search-result-snippet {
  font-size: 0.85rem;
  color: var(--muted-foreground);
}

.search-result-snippet mark {
  background: #fff8c5;
  color: inherit;
}

.search-empty {
  padding: 0.6rem 0.8rem;
  color: var(--muted-foreground);
}

/* Layout */
.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) minmax(0, 1fr) var(--toc-width);
  min-height: calc(100vh - var(--top-bar-height));
}

.sidebar {
  position: sticky;
  top: var(--top-bar-height);
  height: calc(100vh - var(--top-bar-height));
  overflow-y: auto;
  padding: 1.25rem 1rem;
  background: var(--muted);
  border-right: 1px solid var(--border);
}

.sidebar-label {
  margin-bottom: 0.5rem;
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
}

.nav-list,
.nav-section-pages {
  list-style: none;
  margin: 0;
  padding: 0;
}

.nav-section-pages {
  padding-left: 0.75rem;
}

.nav-item a {
  display: block;
  padding: 0.25rem 0.5rem;
  border-radius: 4px;
  color: var(--foreground);
  font-size: 0.9rem;
}

.nav-item a:hover {
  background: var(--border);
  text-decoration: none;
}

.nav-item.active a {
  background: var(--primary);
  color: #ffffff;
}

.nav-section-title {
  padding: 0.35rem 0.5rem;
  font-size: 0.85rem;
  font-weight: 600;
  cursor: pointer;
}

/* Content */
.main {
  padding: 2rem 3rem 4rem;
  min-width: 0;
}

.breadcrumbs {
  display: flex;
  flex-wrap: wrap;
  gap: 0.4rem;
  margin-bottom: 1.25rem;
  font-size: 0.85rem;
  color: var(--muted-foreground);
}

.breadcrumb-current {
  color: var(--foreground);
}

.doc {
  max-width: var(--content-max-width);
}

.doc h1,
.doc h2,
.doc h3,
.doc h4 {
  line-height: 1.25;
  scroll-margin-top: calc(var(--top-bar-height) + 1rem);
}

.doc h1 {
  font-size: 2rem;
  margin-top: 0;
}

.doc h2 {
  padding-bottom: 0.3rem;
  border-bottom: 1px solid var(--border);
}

.doc code {
  padding: 0.15em 0.35em;
  border-radius: 4px;
  background: var(--code-background);
  font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
  font-size: 0.875em;
}

.doc pre {
  padding: 1rem;
  overflow-x: auto;
  border-radius: 6px;
  background: var(--code-background);
}

.doc pre code {
  padding: 0;
  background: none;
}

.doc table {
  border-collapse: collapse;
  margin: 1rem 0;
}

.doc th,
.doc td {
  padding: 0.4rem 0.8rem;
  border: 1px solid var(--border);
}

.doc th {
  background: var(--muted);
}

.doc blockquote {
  margin: 1rem 0;
  padding: 0 1rem;
  border-left: 4px solid var(--border);
  color: var(--muted-foreground);
}

.doc img {
  max-width: 100%;
}

.page-nav {
  display: flex;
  justify-content: space-between;
  gap: 1rem;
  max-width: var(--content-max-width);
  margin-top: 3rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
}

.page-nav-next {
  margin-left: auto;
}

/* Table of contents */
.toc {
  position: sticky;
  top: var(--top-bar-height);
  height: calc(100vh - var(--top-bar-height));
  overflow-y: auto;
  padding: 2rem 1rem;
  font-size: 0.85rem;
}

.toc-title {
  margin-bottom: 0.5rem;
  font-weight: 600;
}

.toc ul {
  list-style: none;
  margin: 0;
  padding-left: 0.75rem;
}

.toc > ul {
  padding-left: 0;
}

.toc a {
  color: var(--muted-foreground);
}

/* Diagrams */
.mermaid {
  margin: 1.5rem 0;
  text-align: center;
}

.mermaid[data-lightbox] {
  cursor: zoom-in;
}

.mermaid-overlay {
  display: none;
  position: fixed;
  inset: 0;
  z-index: 100;
  align-items: center;
  justify-content: center;
  background: rgba(0, 0, 0, 0.7);
}

.mermaid-overlay.visible {
  display: flex;
}

.mermaid-overlay-content {
  width: 92vw;
  height: 88vh;
  overflow: hidden;
  border-radius: 8px;
  background: var(--background);
  cursor: grab;
}

.mermaid-overlay-content svg {
  width: 100%;
  height: 100%;
  transform-origin: 0 0;
}

@media (max-width: 1100px) {
  .layout {
    grid-template-columns: var(--sidebar-width) minmax(0, 1fr);
  }

  .toc {
    display: none;
  }
}

@media (max-width: 720px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
  }

  .main {
    padding: 1.5rem 1rem 3rem;
  }
}
"#;

const SEARCH_JS: &str = r#"(function () {
  'use strict';

  var MIN_QUERY = 2;
  var MAX_RESULTS = 10;
  var SNIPPET_BEFORE = 40;
  var SNIPPET_AFTER = 60;

  function escapeHtml(text) {
    return String(text).replace(/[&<>"']/g, function (c) {
      return { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c];
    });
  }

  function snippet(text, query) {
    var pos = text.toLowerCase().indexOf(query);
    if (pos === -1) return '';
    var start = Math.max(0, pos - SNIPPET_BEFORE);
    var end = Math.min(text.length, pos + query.length + SNIPPET_AFTER);
    return (start > 0 ? '...' : '') +
      escapeHtml(text.substring(start, pos)) +
      '<mark>' + escapeHtml(text.substring(pos, pos + query.length)) + '</mark>' +
      escapeHtml(text.substring(pos + query.length, end)) +
      (end < text.length ? '...' : '');
  }

  function search(index, query) {
    var matches = [];
    index.forEach(function (page) {
      var titleMatch = page.title.toLowerCase().indexOf(query) !== -1;
      var textMatch = page.text.toLowerCase().indexOf(query) !== -1;
      if (titleMatch || textMatch) {
        matches.push({ page: page, titleMatch: titleMatch });
      }
    });
    var titled = matches.filter(function (m) { return m.titleMatch; });
    var rest = matches.filter(function (m) { return !m.titleMatch; });
    return titled.concat(rest).slice(0, MAX_RESULTS);
  }

  document.addEventListener('DOMContentLoaded', function () {
    var input = document.getElementById('wiki-search');
    var results = document.getElementById('search-results');
    if (!input || !results) return;

    var index = window.WIKI_SEARCH_INDEX || [];
    var base = (window.WIKI && window.WIKI.basePrefix) || '';

    function update() {
      var query = input.value.trim().toLowerCase();
      if (query.length < MIN_QUERY) {
        results.classList.remove('visible');
        results.innerHTML = '';
        return;
      }

      var hits = search(index, query);
      if (hits.length === 0) {
        results.innerHTML = '<div class="search-empty">No results</div>';
      } else {
        results.innerHTML = hits.map(function (hit) {
          return '<a class="search-result" href="' + escapeHtml(base + hit.page.url) + '">' +
            '<div class="search-result-title">' + escapeHtml(hit.page.title) + '</div>' +
            '<div class="search-result-snippet">' + snippet(hit.page.text, query) + '</div>' +
            '</a>';
        }).join('');
      }
      results.classList.add('visible');
    }

    input.addEventListener('input', update);
    input.addEventListener('focus', update);
    input.addEventListener('keydown', function (e) {
      if (e.key === 'Escape') {
        input.value = '';
        update();
        input.blur();
      }
    });
    document.addEventListener('click', function (e) {
      if (!results.contains(e.target) && e.target !== input) {
        results.classList.remove('visible');
      }
    });
  });
})();
"#;

const LIGHTBOX_JS: &str = r#"(function () {
  'use strict';

  var MIN_SCALE = 0.2;
  var MAX_SCALE = 10;

  function init() {
    var overlay = document.getElementById('mermaid-overlay');
    var content = document.getElementById('mermaid-overlay-content');
    if (!overlay || !content) return;

    var scale = 1;
    var translateX = 0;
    var translateY = 0;
    var dragging = false;
    var startX = 0;
    var startY = 0;

    function svg() {
      return content.querySelector('svg');
    }

    function applyTransform() {
      var el = svg();
      if (el) {
        el.style.transform = 'translate(' + translateX + 'px,' + translateY + 'px) scale(' + scale + ')';
      }
    }

    function reset() {
      scale = 1;
      translateX = 0;
      translateY = 0;
      applyTransform();
    }

    function close() {
      overlay.classList.remove('visible');
      content.innerHTML = '';
    }

    function markDiagrams() {
      document.querySelectorAll('.mermaid').forEach(function (el) {
        if (el.querySelector('svg')) el.dataset.lightbox = 'true';
      });
    }

    document.addEventListener('wiki:diagrams-rendered', markDiagrams);
    markDiagrams();

    document.addEventListener('click', function (e) {
      var diagram = e.target.closest && e.target.closest('.mermaid[data-lightbox]');
      if (!diagram || overlay.contains(diagram)) return;
      var source = diagram.querySelector('svg');
      if (!source) return;

      var clone = source.cloneNode(true);
      if (!clone.getAttribute('viewBox')) {
        var box = source.getBBox();
        clone.setAttribute('viewBox', box.x + ' ' + box.y + ' ' + box.width + ' ' + box.height);
      }
      clone.removeAttribute('width');
      clone.removeAttribute('height');
      clone.style.maxWidth = 'none';

      content.innerHTML = '';
      content.appendChild(clone);
      reset();
      overlay.classList.add('visible');
    });

    content.addEventListener('wheel', function (e) {
      e.preventDefault();
      var rect = content.getBoundingClientRect();
      var x = e.clientX - rect.left;
      var y = e.clientY - rect.top;
      var delta = e.deltaY < 0 ? 0.1 : -0.1;
      var next = Math.min(Math.max(scale + delta * scale, MIN_SCALE), MAX_SCALE);
      var ratio = next / scale;
      translateX = x - (x - translateX) * ratio;
      translateY = y - (y - translateY) * ratio;
      scale = next;
      applyTransform();
    }, { passive: false });

    content.addEventListener('mousedown', function (e) {
      dragging = true;
      startX = e.clientX - translateX;
      startY = e.clientY - translateY;
      content.style.cursor = 'grabbing';
      e.preventDefault();
    });

    document.addEventListener('mousemove', function (e) {
      if (!dragging) return;
      translateX = e.clientX - startX;
      translateY = e.clientY - startY;
      applyTransform();
    });

    document.addEventListener('mouseup', function () {
      dragging = false;
      content.style.cursor = '';
    });

    overlay.addEventListener('click', function (e) {
      if (e.target === overlay) close();
    });

    document.addEventListener('keydown', function (e) {
      if (e.key === 'Escape' && overlay.classList.contains('visible')) close();
    });
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', init);
  } else {
    init();
  }
})();
"#;
