//! Mod importer CLI
//!
//! Loads the configuration, sets up logging and runs one import.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use modimp_fs::NormalizedPath;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let config_path = NormalizedPath::new(cwd.join(&cli.config));

    let mut config = commands::load_config(&config_path, cli.overwrite)?;
    commands::apply_overrides(&mut config, &cli)?;
    if cli.modify {
        return commands::run_modify(&config_path, &config);
    }

    let log_file = config.log.then(|| logging::log_file_path(&cwd, &config));
    logging::init(cli.verbose, log_file.as_deref())?;
    tracing::debug!(config = %config_path, "configuration loaded");

    commands::save_config(&config_path, &config)?;
    let ctx = commands::build_context(&cli, &config, &config_path)?;
    let mut echo = commands::StdoutEcho::new(config.echo);
    commands::run_import(ctx, &mut echo)?;
    Ok(())
}
