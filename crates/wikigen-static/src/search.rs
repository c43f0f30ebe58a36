//! Search index.
//!
//! The index is a flat list of `{title, url, text}` records shipped to the
//! browser as `search-index.js`. Ranking happens client-side; [`SearchIndex::query`]
//! applies the same rules so the index can be checked from the terminal:
//!
//! - queries shorter than two characters match nothing
//! - matching is a case-insensitive substring test on title and text
//! - title matches rank above text-only matches, index order is kept otherwise
//! - at most ten results

use serde::Serialize;
use wikigen_md::Page;

/// Per-page cap on indexed text, in characters.
pub const MAX_TEXT_CHARS: usize = 3000;

/// Shortest query that produces results.
pub const MIN_QUERY_CHARS: usize = 2;

/// Results returned per query.
pub const MAX_RESULTS: usize = 10;

/// Global the generated index script assigns.
pub const INDEX_GLOBAL: &str = "WIKI_SEARCH_INDEX";

/// Characters of context shown before and after a text match.
const SNIPPET_BEFORE: usize = 40;
const SNIPPET_AFTER: usize = 60;

/// One searchable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    /// Output path relative to the site root
    pub url: String,
    pub text: String,
}

impl SearchEntry {
    /// Index a page: heading text followed by the body text, capped.
    pub fn from_page(page: &Page) -> Self {
        let mut text = page
            .headings
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if !page.raw_text.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&page.raw_text);
        }

        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        Self {
            title: page.title.clone(),
            url: page.url.clone(),
            text: truncate_chars(&text, MAX_TEXT_CHARS),
        }
    }
}

/// A ranked query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub entry: &'a SearchEntry,
    pub title_match: bool,
    /// Text around the first body match
    pub snippet: Option<String>,
}

/// Search index over all pages, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn build<'a>(pages: impl IntoIterator<Item = &'a Page>) -> Self {
        Self {
            entries: pages.into_iter().map(SearchEntry::from_page).collect(),
        }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Script defining the index as a browser global.
    pub fn to_script(&self) -> Result<String, serde_json::Error> {
        Ok(format!("window.{} = {};\n", INDEX_GLOBAL, self.to_json()?))
    }

    /// Rank entries against a query the way the browser script does.
    pub fn query(&self, query: &str) -> Vec<SearchHit<'_>> {
        let needle = fold(query.trim());
        let needle_len = needle.chars().count();
        if needle_len < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let title_match = fold(&entry.title).contains(&needle);
                let snippet = snippet(&entry.text, &needle, needle_len);
                (title_match || snippet.is_some()).then_some(SearchHit {
                    entry,
                    title_match,
                    snippet,
                })
            })
            .collect();

        hits.sort_by_key(|hit| !hit.title_match);
        hits.truncate(MAX_RESULTS);
        hits
    }
}

/// Case folding that keeps a one-to-one character mapping.
fn fold(text: &str) -> String {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

fn snippet(text: &str, needle: &str, needle_len: usize) -> Option<String> {
    let folded = fold(text);
    let byte_index = folded.find(needle)?;
    let start_char = folded[..byte_index].chars().count();

    let chars: Vec<char> = text.chars().collect();
    let start = start_char.saturating_sub(SNIPPET_BEFORE);
    let end = (start_char + needle_len + SNIPPET_AFTER).min(chars.len());

    let mut out = String::new();
    if start > 0 {
        out.push_str("...");
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push_str("...");
    }
    Some(out)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
