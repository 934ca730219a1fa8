//! Tracing setup: console output plus an optional per-run log file

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use modimp_core::ImporterConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::{CliError, Result};

/// Timestamp embedded in log file names
const LOG_TIMESTAMP: &str = "%d.%m.%Y-%I.%M%p-%S.%6f";

/// Path of this run's log file inside `base`.
pub fn log_file_path(base: &Path, config: &ImporterConfig) -> PathBuf {
    let stamp = Local::now().format(LOG_TIMESTAMP);
    base.join(&config.log_folder).join(format!(
        "{}{}{}",
        config.log_prefix, stamp, config.log_suffix
    ))
}

/// Install the global subscriber.
///
/// The console shows warnings, or debug output with `verbose`; `RUST_LOG`
/// overrides both. When `log_file` is set, info and above also go there.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(console_filter);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
