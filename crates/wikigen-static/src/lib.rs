//! Static wiki builder.
//!
//! Turns a directory of Markdown files into a browsable HTML wiki: sidebar
//! navigation, breadcrumbs, per-page table of contents, prev/next links and
//! client-side search.
//!
//! ```text
//! sources ──► pages ──► navigation tree + search index ──► HTML files
//! ```
//!
//! [`Site`] holds the fully resolved in-memory model; [`StaticBuilder`] writes
//! it out.

pub mod assets;
pub mod builder;
pub mod config;
pub mod discover;
pub mod layout;
pub mod nav;
pub mod search;
pub mod site;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, ErrorKind, StaticBuilder};
pub use config::{ConfigError, PageRef, SectionConfig, SiteConfig};
pub use nav::{NavEntry, NavError, NavTree, PageId, Section};
pub use search::{SearchEntry, SearchHit, SearchIndex};
pub use site::Site;
