//! Filename conventions shared by pages and directories.
//!
//! Source files and directories may carry a numeric ordering prefix:
//! `10-intro.md`, `2_setup.md`, `01 Guides/`. The prefix decides the order in
//! discovery mode and is dropped from any title derived from the name.
//!
//! ## Ordering
//!
//! Within one directory, prefixed entries come first, sorted by number and then
//! by full name. Unprefixed entries follow in plain lexicographic order:
//!
//! - `1-overview.md`, `2-setup.md`, `10-intro.md`, `changelog.md`, `faq.md`

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:[-_. ]+|$)(.*)$").expect("valid prefix regex"));

/// Result of parsing an entry name like `020-getting-started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName<'a> {
    /// Number prefix if present
    pub number: Option<u64>,
    /// Name after the prefix and its separator (the whole input if unprefixed)
    pub name: &'a str,
}

/// Parse a file stem or directory name following the `NNN-name` convention.
///
/// - `"020-getting-started"` → number=Some(20), name="getting-started"
/// - `"3_faq"` → number=Some(3), name="faq"
/// - `"007"` → number=Some(7), name=""
/// - `"2024report"` → number=None, name="2024report"
pub fn parse_entry_name(name: &str) -> ParsedName<'_> {
    if let Some(caps) = PREFIX_RE.captures(name) {
        if let Ok(number) = caps[1].parse::<u64>() {
            let rest = caps.get(2).map_or("", |m| m.as_str());
            return ParsedName {
                number: Some(number),
                name: rest,
            };
        }
    }

    ParsedName { number: None, name }
}

/// Order two sibling entry names (files or directories).
pub fn compare_entry_names(a: &str, b: &str) -> Ordering {
    let pa = parse_entry_name(strip_md(a));
    let pb = parse_entry_name(strip_md(b));

    match (pa.number, pb.number) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Title derived from a file stem: prefix dropped, separators to spaces,
/// each word title-cased.
///
/// `"02-getting_started"` → `"Getting Started"`, `"README"` → `"Readme"`
pub fn title_from_stem(stem: &str) -> String {
    let parsed = parse_entry_name(stem);
    let name = if parsed.name.is_empty() { stem } else { parsed.name };
    title_case(&words(name))
}

/// Section title derived from a directory name.
///
/// Short all-letter names read as acronyms (`api` → `API`), everything else is
/// title-cased (`core-services` → `Core Services`).
pub fn section_title(dir_name: &str) -> String {
    let parsed = parse_entry_name(dir_name);
    let name = if parsed.name.is_empty() {
        dir_name
    } else {
        parsed.name
    };
    let spaced = words(name);

    if spaced.chars().count() <= 4 && spaced.chars().all(char::is_alphabetic) {
        spaced.to_uppercase()
    } else {
        title_case(&spaced)
    }
}

fn strip_md(name: &str) -> &str {
    name.strip_suffix(".md").unwrap_or(name)
}

fn words(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
