//! Fenced code block info strings.

/// Info-string languages rendered client-side as diagrams.
pub const DIAGRAM_LANGUAGES: &[&str] = &["mermaid"];

/// Parsed info string of a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FenceInfo {
    /// First word of the info string, lower-cased
    pub language: Option<String>,
}

impl FenceInfo {
    /// Parse a fence info string such as `rust ignore` or `mermaid`.
    pub fn parse(info: &str) -> Self {
        let language = info
            .split_whitespace()
            .next()
            .map(|lang| lang.trim_matches(|c| c == '{' || c == '}' || c == '.'))
            .filter(|lang| !lang.is_empty())
            .map(str::to_lowercase);

        Self { language }
    }

    /// Whether the block holds diagram source for the client-side renderer.
    pub fn is_diagram(&self) -> bool {
        self.language
            .as_deref()
            .is_some_and(|lang| DIAGRAM_LANGUAGES.contains(&lang))
    }
}
