use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use csv2qif_cli::{inputs, logging};
use csv2qif_core::{Config, TracingDiagnostics};
use csv2qif_ingest::Source;
use csv2qif_ledger::Conversion;

#[derive(Parser, Debug)]
#[command(name = "csv2qif", version, about = "Convert bank CSV exports into a QIF account")]
struct Cli {
    /// Bank export, or a directory searched recursively for .csv files
    input: PathBuf,

    /// QIF file to write
    output: PathBuf,

    /// JSON configuration with formats, aliases and mappings
    #[arg(short, long)]
    config: PathBuf,

    /// Format name from the configuration
    #[arg(short, long)]
    format: String,

    /// Account alias naming the QIF account (and the self-transfer account)
    #[arg(short, long)]
    account: String,

    /// Log filter, used when RUST_LOG is unset
    #[arg(long, env = "CSV2QIF_LOG", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let config = Config::from_path(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let conversion = Conversion::new(
        Arc::new(config),
        &cli.format,
        &cli.account,
        Arc::new(TracingDiagnostics),
    )?;

    let files = inputs::expand(&cli.input)?;
    tracing::info!(input = %cli.input.display(), files = files.len(), "discovered inputs");
    let sources = files.into_iter().map(Source::Path).collect();

    let qif = conversion
        .render(sources)
        .await
        .with_context(|| format!("converting {}", cli.input.display()))?;
    fs::write(&cli.output, qif)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    Ok(())
}
