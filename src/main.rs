use anyhow::{Context, Result};
use clap::Parser;

use ptyattach::args::Cli;
use ptyattach::attach::{self, exit_code};
use ptyattach::config::Config;
use ptyattach::logging::init_tracing;

fn main() {
    let cli = Cli::parse();
    match init_tracing() {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "logging to file"),
        Ok(None) => {}
        Err(err) => eprintln!("Warning: logging disabled: {err}"),
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let options = cli.into_options(&config)?;
    tracing::debug!(?options, "launch options");

    let status = attach::run(&options)
        .with_context(|| format!("failed to attach '{}'", options.command))?;
    Ok(exit_code(status))
}
