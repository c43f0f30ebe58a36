//! Markdown to HTML rendering.

use std::sync::LazyLock;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

use crate::anchor::AnchorRegistry;
use crate::codeblock::FenceInfo;

/// CSS class of the container emitted for diagram blocks.
pub const DIAGRAM_CLASS: &str = "mermaid";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("valid tag regex"));

/// Disclosure widgets are the only raw markup kept as markup.
static ALLOWED_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</?(?i:details|summary)(?:\s[^<>]*)?/?>$").expect("valid allowlist regex")
});

/// A heading found while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text with inline markup removed
    pub text: String,
    /// Anchor id, unique within the page
    pub id: String,
}

/// Output of rendering one Markdown document.
#[derive(Debug, Clone, Default)]
pub struct RenderedDoc {
    /// HTML fragment
    pub html: String,

    /// Headings in document order
    pub headings: Vec<Heading>,

    /// Body text without headings, code blocks or markup, whitespace collapsed
    pub plain_text: String,

    /// Number of diagram blocks in the document
    pub diagrams: usize,
}

struct PendingHeading {
    index: usize,
    level: HeadingLevel,
    text: String,
}

/// Render Markdown to HTML.
///
/// Never fails: constructs the parser does not recognize come out as literal
/// text, and so does raw HTML other than `<details>`/`<summary>`. Headings receive `id` attributes from a registry scoped to this call,
/// fenced diagram blocks become `<div class="mermaid">` containers, and
/// relative links to `.md` files are pointed at the `.html` output.
pub fn render_markdown(source: &str) -> RenderedDoc {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(source, options).map(literal_html);

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut anchors = AnchorRegistry::new();
    let mut headings = Vec::new();
    let mut plain = String::new();
    let mut diagrams = 0;

    let mut heading: Option<PendingHeading> = None;
    let mut diagram: Option<String> = None;
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(PendingHeading {
                    index: events.len(),
                    level,
                    text: String::new(),
                });
                events.push(event);
            }

            Event::End(TagEnd::Heading(level)) => {
                if let Some(pending) = heading.take() {
                    let text = pending.text.trim().to_string();
                    let id = anchors.assign(&text);
                    if let Some(Event::Start(Tag::Heading { id: slot, .. })) =
                        events.get_mut(pending.index)
                    {
                        *slot = Some(CowStr::from(id.clone()));
                    }
                    headings.push(Heading {
                        level: heading_level_to_num(pending.level),
                        text,
                        id,
                    });
                }
                events.push(Event::End(TagEnd::Heading(level)));
            }

            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                if FenceInfo::parse(&info).is_diagram() =>
            {
                diagram = Some(String::new());
            }

            Event::End(TagEnd::CodeBlock) if diagram.is_some() => {
                let body = diagram.take().unwrap_or_default();
                events.push(Event::Html(CowStr::from(format!(
                    "<div class=\"{}\">{}</div>\n",
                    DIAGRAM_CLASS,
                    escape_html(&body)
                ))));
                diagrams += 1;
            }

            Event::Text(text) if diagram.is_some() => {
                if let Some(body) = diagram.as_mut() {
                    body.push_str(&text);
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }

            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                plain.push(' ');
                events.push(event);
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match rewrite_md_link(&dest_url) {
                    Some(rewritten) => CowStr::from(rewritten),
                    None => dest_url,
                };
                events.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }));
            }

            Event::Text(ref text) | Event::Code(ref text) => {
                if let Some(pending) = heading.as_mut() {
                    pending.text.push_str(text);
                } else if !in_code_block {
                    plain.push_str(text);
                }
                events.push(event);
            }

            Event::Html(ref raw) | Event::InlineHtml(ref raw) => {
                if heading.is_none() && !in_code_block {
                    plain.push_str(&TAG_RE.replace_all(raw, " "));
                }
                events.push(event);
            }

            Event::SoftBreak | Event::HardBreak => {
                if let Some(pending) = heading.as_mut() {
                    pending.text.push(' ');
                } else {
                    plain.push(' ');
                }
                events.push(event);
            }

            Event::End(
                TagEnd::Paragraph
                | TagEnd::Item
                | TagEnd::TableCell
                | TagEnd::FootnoteDefinition
                | TagEnd::HtmlBlock,
            ) => {
                plain.push(' ');
                events.push(event);
            }

            _ => events.push(event),
        }
    }

    let mut html_output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut html_output, events.into_iter());

    RenderedDoc {
        html: html_output,
        headings,
        plain_text: collapse_whitespace(&plain),
        diagrams,
    }
}

/// Turn raw HTML into text unless every tag in it is on the allowlist.
fn literal_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) if !is_passthrough_html(&raw) => {
            Event::Text(raw)
        }
        other => other,
    }
}

fn is_passthrough_html(raw: &str) -> bool {
    let mut tags = TAG_RE.find_iter(raw).peekable();
    if tags.peek().is_none() {
        return false;
    }
    if !tags.all(|tag| ALLOWED_TAG_RE.is_match(tag.as_str())) {
        return false;
    }
    !TAG_RE.replace_all(raw, "").contains(['<', '>'])
}

/// Point a relative link at a Markdown file to the rendered `.html` page.
///
/// External URLs, absolute paths and fragment-only links return `None`.
fn rewrite_md_link(url: &str) -> Option<String> {
    if url.is_empty()
        || url.starts_with('#')
        || url.starts_with('/')
        || url.contains("://")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
    {
        return None;
    }

    let (path, fragment) = match url.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (url, None),
    };

    let stem = path.strip_suffix(".md")?;

    Some(match fragment {
        Some(fragment) => format!("{stem}.html#{fragment}"),
        None => format!("{stem}.html"),
    })
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
