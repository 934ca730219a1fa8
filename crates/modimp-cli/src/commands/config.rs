//! Loading, overriding and saving the importer configuration

use colored::Colorize;
use modimp_core::{ImporterConfig, Profile};
use modimp_fs::{ConfigStore, Fingerprinter, NormalizedPath};
use tracing::debug;

use crate::cli::Cli;
use crate::error::Result;

/// Load the configuration file, or defaults when it is missing or
/// `--overwrite` was given.
pub fn load_config(path: &NormalizedPath, overwrite: bool) -> Result<ImporterConfig> {
    if overwrite {
        debug!(path = %path, "ignoring existing configuration");
        return Ok(ImporterConfig::default());
    }
    Ok(ConfigStore::new().load_or_default(path)?)
}

/// Fold the command-line settings into `config`.
///
/// # Errors
///
/// Fails if `--hashes` names an unknown algorithm or `--special-set` is not
/// a JSON object of profile fields.
pub fn apply_overrides(config: &mut ImporterConfig, cli: &Cli) -> Result<()> {
    if cli.no_echo {
        config.echo = false;
    }
    if cli.no_log {
        config.log = false;
    }
    if let Some(hashes) = &cli.hashes {
        let names: Vec<String> = hashes.split_whitespace().map(str::to_string).collect();
        Fingerprinter::from_names(&names)?;
        config.hashes = names;
    }
    if let Some(profile) = &cli.profile {
        config.profile = Some(profile.clone());
    }
    if let Some(fields) = &cli.special_set {
        let overlay: Profile = serde_json::from_str(fields)?;
        config.profile_special.merge(&overlay);
    }
    Ok(())
}

/// Write the effective configuration back to disk.
pub fn save_config(path: &NormalizedPath, config: &ImporterConfig) -> Result<()> {
    ConfigStore::new().save(path, config)?;
    debug!(path = %path, "configuration saved");
    Ok(())
}

/// `--modify`: persist the settings and report where they went.
pub fn run_modify(path: &NormalizedPath, config: &ImporterConfig) -> Result<()> {
    save_config(path, config)?;
    println!("{} {}", "Saved configuration to".green(), path.to_string().cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("modimp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("modimp.toml"));
        assert_eq!(load_config(&path, false).unwrap(), ImporterConfig::default());
    }

    #[test]
    fn overwrite_ignores_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("modimp.toml"));
        std::fs::write(path.to_native(), "echo = false\n").unwrap();

        assert!(!load_config(&path, false).unwrap().echo);
        assert!(load_config(&path, true).unwrap().echo);
    }

    #[test]
    fn overrides_apply() {
        let mut config = ImporterConfig::default();
        apply_overrides(
            &mut config,
            &cli(&[
                "--no-echo",
                "--hashes",
                "sha1  sha256",
                "--profile",
                "Pyre",
                "--special-set",
                "{\"folder_mods\": \"Workshop\"}",
            ]),
        )
        .unwrap();

        assert!(!config.echo);
        assert!(config.log);
        assert_eq!(config.hashes, vec!["sha1", "sha256"]);
        assert_eq!(config.profile.as_deref(), Some("Pyre"));
        assert_eq!(config.profile_special.folder_mods.as_deref(), Some("Workshop"));
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let mut config = ImporterConfig::default();
        assert!(apply_overrides(&mut config, &cli(&["--hashes", "crc32"])).is_err());
        assert!(apply_overrides(&mut config, &cli(&["--special-set", "[1]"])).is_err());
        assert_eq!(config.hashes, vec!["md5"]);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("modimp.json"));
        let mut config = ImporterConfig::default();
        config.log = false;

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path, false).unwrap(), config);
    }
}
