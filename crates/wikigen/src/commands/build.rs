//! Static site build command.

use anyhow::{Context, Result};
use wikigen_static::{BuildConfig, StaticBuilder};

/// Run the build command.
pub fn run(config: BuildConfig) -> Result<()> {
    let input = config.input_dir.clone();
    tracing::info!("Building wiki from {}...", input.display());

    let result = StaticBuilder::new(config)
        .build()
        .with_context(|| format!("building wiki from {}", input.display()))?;

    tracing::info!(
        "Built {} pages in {}ms",
        result.pages,
        result.duration_ms
    );

    if result.redirect {
        tracing::debug!("index.html redirects to the first page");
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
