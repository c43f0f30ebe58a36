//! wikigen CLI - static Markdown wiki generator.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use wikigen_static::{BuildConfig, BuildError, ErrorKind};

mod commands;

#[derive(Parser)]
#[command(name = "wikigen")]
#[command(about = "Turn a directory of Markdown files into a static HTML wiki")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory of Markdown sources
    #[arg(short, long, global = true, default_value = "wiki")]
    input: PathBuf,

    /// Output directory (defaults to the input directory)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Site title, overriding the config file
    #[arg(long, global = true)]
    title: Option<String>,

    /// HTML language tag, overriding the config file
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Site config file (JSON, TOML or YAML); wiki.json etc. in the input
    /// directory are picked up automatically
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static wiki (default)
    Build {
        /// Skip stylesheet minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Resolve and render every page without writing output
    Check,

    /// Query the search index from the terminal
    Search {
        /// Text to look for
        query: String,
    },
}

impl Cli {
    fn build_config(&self) -> BuildConfig {
        BuildConfig {
            input_dir: self.input.clone(),
            output_dir: self.output.clone().unwrap_or_else(|| self.input.clone()),
            config_path: self.config.clone(),
            title: self.title.clone(),
            lang: self.lang.clone(),
            minify: true,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = cli.build_config();

    // Execute command
    match cli.command {
        None => commands::build::run(config)?,
        Some(Commands::Build { no_minify }) => {
            config.minify = !no_minify;
            commands::build::run(config)?;
        }
        Some(Commands::Check) => commands::check::run(config)?,
        Some(Commands::Search { query }) => commands::search::run(config, &query)?,
    }

    Ok(())
}

/// Exit status: 2 input, 3 reference, 4 output, 1 anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<BuildError>().map(BuildError::kind) {
        Some(ErrorKind::Input) => 2,
        Some(ErrorKind::Reference) => 3,
        Some(ErrorKind::Output) => 4,
        Some(ErrorKind::Render) | None => 1,
    }
}
