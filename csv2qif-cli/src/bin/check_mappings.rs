use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use csv2qif_cli::logging;
use csv2qif_core::Config;
use csv2qif_ledger::find_conflicts;

#[derive(Parser, Debug)]
#[command(
    name = "csv2qif-check",
    version,
    about = "Report mapping patterns that also match another account's patterns"
)]
struct Cli {
    /// JSON configuration to check
    #[arg(short, long)]
    config: PathBuf,

    #[arg(long, env = "CSV2QIF_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let config = Config::from_path(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if config.mappings.is_empty() {
        tracing::warn!(config = %cli.config.display(), "no mappings to check");
    }
    let conflicts = find_conflicts(&config.mappings);
    for conflict in &conflicts {
        println!("{conflict}");
    }
    tracing::info!(accounts = config.mappings.len(), conflicts = conflicts.len(), "checked mappings");

    if conflicts.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{} conflicting pattern pair(s)", conflicts.len());
        Ok(ExitCode::FAILURE)
    }
}
