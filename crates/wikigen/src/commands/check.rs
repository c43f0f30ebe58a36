//! Validation command: everything a build does except writing.

use anyhow::{Context, Result};
use wikigen_static::{BuildConfig, StaticBuilder};

/// Run the check command.
pub fn run(config: BuildConfig) -> Result<()> {
    let input = config.input_dir.clone();
    let site = StaticBuilder::new(config)
        .check()
        .with_context(|| format!("checking wiki in {}", input.display()))?;

    let sections = count_sections(site.nav().root());
    tracing::info!(
        "OK: {} pages, {} sections, {} search entries",
        site.pages().len(),
        sections,
        site.search().entries().len()
    );

    Ok(())
}

fn count_sections(section: &wikigen_static::Section) -> usize {
    section.sections().map(|s| 1 + count_sections(s)).sum()
}
