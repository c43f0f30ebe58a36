//! Markdown rendering and page model for wikigen.
//!
//! This crate turns one Markdown document into an HTML fragment plus the
//! structural data the site builder needs: the heading outline with unique
//! anchor ids, a plain-text rendering for search, and whether the page holds
//! diagram blocks. Nothing here touches the filesystem.

pub mod anchor;
pub mod codeblock;
pub mod naming;
pub mod page;
pub mod render;

pub use anchor::{slugify, AnchorRegistry};
pub use codeblock::FenceInfo;
pub use naming::{compare_entry_names, parse_entry_name, ParsedName};
pub use page::{output_path_for, Page};
pub use render::{render_markdown, Heading, RenderedDoc};
