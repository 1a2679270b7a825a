//! Supported Distributions Generator
//!
//! Fetches the sweeps configuration schema and prints the
//! `SUPPORTED_DISTRIBUTIONS` constant to stdout. Logs go to stderr.
//!
//! Usage:
//!   supported-distributions
//!   supported-distributions --schema ./schema.json --format json
//!   supported-distributions --dot schema.dot

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sweep_distributions::{generate, GeneratorConfig, OutputFormat, SchemaDocument};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "supported-distributions")]
#[command(about = "Generate the SUPPORTED_DISTRIBUTIONS table from the sweeps JSON Schema")]
struct Cli {
    /// Extra config file (distributions.toml format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the schema from a local file instead of fetching it
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Fetch the schema from this URL
    #[arg(short, long)]
    url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also write the decoded reference graph as GraphViz DOT
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    if let Some(url) = cli.url {
        config.source.url = url;
        config.source.path = None;
    }
    if let Some(path) = cli.schema {
        config.source.path = Some(path);
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let source = config.source.schema_source();
    let document = SchemaDocument::load(&source, config.source.timeout())
        .with_context(|| format!("failed to load schema from {}", source))?;

    let output = generate(&document.value, &config)?;

    if let Some(dot_path) = cli.dot {
        std::fs::write(&dot_path, output.graph.to_dot())
            .with_context(|| format!("failed to write {}", dot_path.display()))?;
        tracing::info!(path = %dot_path.display(), "Exported reference graph");
    }

    print!("{}", output.text);
    Ok(())
}
