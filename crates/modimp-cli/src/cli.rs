//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use modimp_core::config::CONFIG_FILE;

/// Mod importer - apply mod directive files to a game's content folder
///
/// Restores files patched by the previous run, then reads every
/// `Mods/<mod>/modfile.txt` and patches the game's files accordingly.
///
/// Examples:
///   modimp                          # Import using the game folder's profile
///   modimp --profile Pyre           # Force a profile
///   modimp --hashes "md5 sha1"      # Fingerprint edits with two digests
///   modimp --no-log --modify        # Disable log files and save the setting
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "modimp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, default_value = CONFIG_FILE, env = "MODIMP_CONFIG")]
    pub config: PathBuf,

    /// Game directory; defaults to the profile's setting or the parent folder
    #[arg(short, long)]
    pub game: Option<PathBuf>,

    /// Profile to use instead of the configured or folder profile
    #[arg(short, long, conflicts_with = "special")]
    pub profile: Option<String>,

    /// Use the special profile from the configuration
    #[arg(short, long)]
    pub special: bool,

    /// JSON object of profile fields merged into the special profile
    #[arg(long, value_name = "JSON")]
    pub special_set: Option<String>,

    /// Space-separated digest algorithms for edit fingerprints
    #[arg(long, value_name = "LIST")]
    pub hashes: Option<String>,

    /// Save the command-line settings to the configuration file and exit
    #[arg(short, long)]
    pub modify: bool,

    /// Start from default settings instead of the existing configuration
    #[arg(short, long)]
    pub overwrite: bool,

    /// Do not write a log file
    #[arg(long)]
    pub no_log: bool,

    /// Do not print progress lines
    #[arg(long)]
    pub no_echo: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
