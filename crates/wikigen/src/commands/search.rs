//! Search command: rank pages against a query from the terminal.

use anyhow::{Context, Result};
use wikigen_static::{BuildConfig, Site};

/// Run the search command.
pub fn run(config: BuildConfig, query: &str) -> Result<()> {
    let site = Site::load(&config)
        .with_context(|| format!("loading wiki from {}", config.input_dir.display()))?;
    let hits = site.search().query(query);

    if hits.is_empty() {
        tracing::info!("No results for '{}'", query);
        return Ok(());
    }

    for hit in hits {
        println!("{}  ({})", hit.entry.title, hit.entry.url);
        if let Some(snippet) = &hit.snippet {
            println!("    {}", snippet);
        }
    }

    Ok(())
}
