//! Source discovery.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};
use wikigen_md::compare_entry_names;

use crate::builder::BuildError;

/// A Markdown source file read from the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the input directory, `/`-separated
    pub path: String,
    /// File contents
    pub text: String,
}

/// Read every `.md` file below `input_dir`.
///
/// Files come back in discovery order: within each directory, files before
/// subdirectories, each group ordered by [`compare_entry_names`]. Hidden
/// files and directories are skipped.
pub fn discover_sources(input_dir: &Path) -> Result<Vec<SourceFile>, BuildError> {
    if !input_dir.is_dir() {
        return Err(BuildError::MissingInput(input_dir.to_path_buf()));
    }

    let mut sources = Vec::new();

    let walker = WalkDir::new(input_dir)
        .follow_links(true)
        .sort_by(discovery_order)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| BuildError::Read {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.to_path_buf()),
            source: e.into(),
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md")
        {
            continue;
        }

        let text = fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let relative = path.strip_prefix(input_dir).unwrap_or(path);
        let rel_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        tracing::debug!("Discovered {}", rel_path);
        sources.push(SourceFile {
            path: rel_path,
            text,
        });
    }

    Ok(sources)
}

fn discovery_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();

    a_dir.cmp(&b_dir).then_with(|| {
        compare_entry_names(
            &a.file_name().to_string_lossy(),
            &b.file_name().to_string_lossy(),
        )
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
