//! The import run

use std::path::Path;

use modimp_core::context::DEFAULT_GAME_DIR;
use modimp_core::{EchoSink, ImportContext, ImporterConfig, ModImporter, RunSummary};
use modimp_fs::{Fingerprinter, NormalizedPath};
use tracing::info;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Prints progress lines to stdout and forwards them to the log.
#[derive(Debug)]
pub struct StdoutEcho {
    print: bool,
}

impl StdoutEcho {
    pub fn new(print: bool) -> Self {
        Self { print }
    }
}

impl EchoSink for StdoutEcho {
    fn echo(&mut self, line: &str) {
        if self.print {
            println!("{line}");
        }
        info!(target: "modimp::echo", "{line}");
    }
}

/// Name of the game folder, used to pick the folder profile.
fn folder_name(game: &Path) -> String {
    let resolved = NormalizedPath::canonicalize(game).unwrap_or_else(|_| NormalizedPath::new(game));
    resolved.file_name().unwrap_or_default().to_string()
}

/// Resolve the profile and build the run's context.
///
/// # Errors
///
/// Fails if no matching profile is configured or the game folder layout
/// is invalid.
pub fn build_context(
    cli: &Cli,
    config: &ImporterConfig,
    config_path: &NormalizedPath,
) -> Result<ImportContext> {
    let game = cli.game.as_deref().unwrap_or(Path::new(DEFAULT_GAME_DIR));
    let (name, profile) =
        config.resolve_profile(cli.special, cli.profile.as_deref(), &folder_name(game))?;
    info!(profile = %name, "profile selected");

    let game_override = cli.game.as_ref().map(NormalizedPath::new);
    let mut protected = vec![config_path.clone()];
    if let Ok(exe) = std::env::current_exe() {
        protected.push(NormalizedPath::new(exe));
    }

    let ctx = ImportContext::from_profile(&name, &profile, game_override.as_ref())?
        .with_fingerprinter(Fingerprinter::from_names(&config.hashes)?)
        .with_protected(protected);
    Ok(ctx)
}

/// Run the import with the built-in payloads.
pub fn run_import(ctx: ImportContext, echo: &mut dyn EchoSink) -> Result<RunSummary> {
    if ctx.default_target.is_empty() {
        info!(profile = %ctx.profile_name, "profile has no default target");
    }
    let importer = ModImporter::new(ctx);
    importer.run(echo).map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use modimp_test_utils::GameFixture;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("modimp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn folder_profile_comes_from_game_folder() {
        let game = GameFixture::new();
        let config_path = NormalizedPath::new(game.root().join("modimp.toml"));
        let args = cli(&["--game", game.game_dir().as_str()]);

        let ctx = build_context(&args, &ImporterConfig::default(), &config_path).unwrap();
        assert_eq!(ctx.profile_name, "Hades");
        assert_eq!(ctx.default_target, vec!["Scripts/RoomManager.lua"]);
        assert!(ctx.protected.contains(&config_path));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let game = GameFixture::new();
        let config_path = NormalizedPath::new(game.root().join("modimp.toml"));
        let args = cli(&["--game", game.game_dir().as_str(), "--profile", "Celeste"]);

        let err = build_context(&args, &ImporterConfig::default(), &config_path).unwrap_err();
        assert!(err.to_string().contains("Celeste"), "{err}");
    }

    #[test]
    fn special_profile_uses_configured_folders() {
        let game = GameFixture::new();
        let config_path = NormalizedPath::new(game.root().join("modimp.toml"));
        let mut config = ImporterConfig::default();
        config.profile_special.folder_mods = Some("Workshop".to_string());
        let args = cli(&["--game", game.game_dir().as_str(), "--special"]);

        let ctx = build_context(&args, &config, &config_path).unwrap();
        assert_eq!(ctx.profile_name, "special");
        assert_eq!(ctx.mods_dir, game.content_dir().join("Workshop"));
    }

    #[test]
    fn run_import_patches_game() {
        let game = GameFixture::new();
        game.content_file("Scripts/RoomManager.lua", "Base()");
        game.mod_file("MyMod", "mod.lua", "Mod()");
        game.modfile("MyMod", "Top Import mod.lua");
        let config_path = NormalizedPath::new(game.root().join("modimp.toml"));
        let args = cli(&["--game", game.game_dir().as_str()]);

        let ctx = build_context(&args, &ImporterConfig::default(), &config_path).unwrap();
        let summary = run_import(ctx, &mut StdoutEcho::new(false)).unwrap();
        assert_eq!(summary.files, 1);
        game.assert_content(
            "Scripts/RoomManager.lua",
            "Import \"../Deploy/MyMod/mod.lua\"\nBase()",
        );
    }
}
