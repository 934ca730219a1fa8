//! The resolved settings of one import run

use std::path::Path;

use modimp_fs::{Fingerprinter, NormalizedPath};

use crate::config::Profile;
use crate::scope::ScopeVerdict;
use crate::{Error, Result};

/// Folder inside the game directory that the importer may modify
pub const SCOPE_FOLDER: &str = "Content";
/// Directive file looked up in every mod folder
pub const MODFILE_NAME: &str = "modfile.txt";
/// Suffix of fingerprint files in the edit cache
pub const FINGERPRINT_SUFFIX: &str = ".hash";
pub const DEFAULT_PRIORITY: i64 = 100;
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Game directory used when neither the profile nor the caller names one
pub const DEFAULT_GAME_DIR: &str = "..";
const DEFAULT_DEPLOY_FOLDER: &str = "Deploy";
const DEFAULT_MODS_FOLDER: &str = "Mods";
const DEFAULT_BASE_FOLDER: &str = "Base Cache";
const DEFAULT_EDIT_FOLDER: &str = "Edit Cache";

/// Paths and defaults shared by every stage of a run
///
/// Built once from the selected [`Profile`] and passed by reference to the
/// interpreter, the dispatch table and the cache manager.
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub profile_name: String,
    pub game_dir: NormalizedPath,
    /// The content folder; nothing outside it is ever patched
    pub scope_dir: NormalizedPath,
    pub mods_dir: NormalizedPath,
    pub deploy_dir: NormalizedPath,
    pub base_dir: NormalizedPath,
    pub edit_dir: NormalizedPath,
    pub default_target: Vec<String>,
    pub default_priority: i64,
    pub modfile_name: String,
    pub fingerprinter: Fingerprinter,
    /// The importer's own files, never touched or read as payloads
    pub protected: Vec<NormalizedPath>,
    pub max_include_depth: usize,
    pub package_patcher: Option<String>,
}

impl ImportContext {
    /// Resolve a profile into absolute paths.
    ///
    /// `game_dir` overrides the profile's `game_dir_path`. Relative game
    /// directories are resolved against the working directory.
    ///
    /// # Errors
    ///
    /// - [`Error::ScopeMissing`] if the game has no content folder
    /// - [`Error::DeployOutOfScope`] if the deployment folder would not be
    ///   visible to the game
    pub fn from_profile(
        name: &str,
        profile: &Profile,
        game_dir: Option<&NormalizedPath>,
    ) -> Result<Self> {
        let requested = match game_dir {
            Some(dir) => dir.clone(),
            None => NormalizedPath::new(
                profile.game_dir_path.as_deref().unwrap_or(DEFAULT_GAME_DIR),
            ),
        };
        let requested = if Path::new(requested.as_str()).is_absolute() {
            requested
        } else {
            NormalizedPath::new(std::env::current_dir()?).join(requested.as_str())
        };
        let game_dir = NormalizedPath::canonicalize(requested.to_native()).map_err(|_| {
            Error::ScopeMissing {
                path: requested.join(SCOPE_FOLDER),
            }
        })?;

        let scope_dir = game_dir.join(SCOPE_FOLDER);
        let folder = |value: &Option<String>, default: &str| {
            let folder = value.as_deref().unwrap_or(default);
            if Path::new(folder).is_absolute() {
                NormalizedPath::new(folder)
            } else {
                scope_dir.join(folder)
            }
        };

        let ctx = Self {
            profile_name: name.to_string(),
            mods_dir: folder(&profile.folder_mods, DEFAULT_MODS_FOLDER),
            deploy_dir: folder(&profile.folder_deployed, DEFAULT_DEPLOY_FOLDER),
            base_dir: folder(&profile.folder_basecache, DEFAULT_BASE_FOLDER),
            edit_dir: folder(&profile.folder_editcache, DEFAULT_EDIT_FOLDER),
            game_dir,
            scope_dir,
            default_target: profile.default_target.clone().unwrap_or_default(),
            default_priority: DEFAULT_PRIORITY,
            modfile_name: MODFILE_NAME.to_string(),
            fingerprinter: Fingerprinter::default(),
            protected: Vec::new(),
            max_include_depth: MAX_INCLUDE_DEPTH,
            package_patcher: profile.package_patcher.clone(),
        };
        ctx.validate()?;
        Ok(ctx)
    }

    pub fn with_fingerprinter(mut self, fingerprinter: Fingerprinter) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    pub fn with_protected<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = NormalizedPath>,
    {
        self.protected.extend(paths);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.scope_verdict(&self.scope_dir, false) != ScopeVerdict::DirInScope {
            return Err(Error::ScopeMissing {
                path: self.scope_dir.clone(),
            });
        }
        if self.scope_verdict(&self.deploy_dir, true) != ScopeVerdict::DirInScope {
            return Err(Error::DeployOutOfScope {
                deploy: self.deploy_dir.clone(),
                scope: self.scope_dir.clone(),
            });
        }
        Ok(())
    }

    /// Path of a target file relative to the content folder.
    pub fn scope_relative(&self, path: &NormalizedPath) -> Option<String> {
        path.relative_to(&self.scope_dir).map(str::to_string)
    }

    /// Where a mod source file is staged for the game to load it.
    pub fn deployed_path(&self, mods_relative: &str) -> NormalizedPath {
        self.deploy_dir.join(mods_relative)
    }

    /// Pristine snapshot location of a target.
    pub fn pristine_path(&self, target: &str) -> NormalizedPath {
        self.base_dir.join(target)
    }

    /// Fingerprint location of a target.
    pub fn fingerprint_path(&self, target: &str) -> NormalizedPath {
        self.edit_dir.join(target).with_suffix(FINGERPRINT_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modimp_test_utils::GameFixture;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_folders_live_in_content() {
        let game = GameFixture::new();
        let ctx = ImportContext::from_profile(
            "Hades",
            &Profile::with_targets(["Scripts/RoomManager.lua"]),
            Some(&game.game_dir()),
        )
        .unwrap();

        assert_eq!(ctx.scope_dir, game.content_dir());
        assert_eq!(ctx.mods_dir, game.content_dir().join("Mods"));
        assert_eq!(ctx.deploy_dir, game.content_dir().join("Deploy"));
        assert_eq!(ctx.base_dir, game.content_dir().join("Base Cache"));
        assert_eq!(ctx.edit_dir, game.content_dir().join("Edit Cache"));
        assert_eq!(ctx.default_target, vec!["Scripts/RoomManager.lua"]);
        assert_eq!(ctx.default_priority, 100);
        assert_eq!(
            ctx.fingerprint_path("Scripts/RoomManager.lua"),
            game.content_dir().join("Edit Cache/Scripts/RoomManager.lua.hash")
        );
    }

    #[test]
    fn missing_content_folder_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImportContext::from_profile(
            "Hades",
            &Profile::default(),
            Some(&NormalizedPath::new(dir.path())),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ScopeMissing { .. }), "{err}");
    }

    #[test]
    fn deploy_folder_must_be_inside_content() {
        let game = GameFixture::new();
        let profile = Profile {
            folder_deployed: Some("../Deploy".into()),
            ..Profile::default()
        };
        let err = ImportContext::from_profile("Hades", &profile, Some(&game.game_dir())).unwrap_err();
        assert!(matches!(err, Error::DeployOutOfScope { .. }), "{err}");
    }

    #[test]
    fn deploy_folder_inside_base_cache_is_rejected() {
        let game = GameFixture::new();
        let profile = Profile {
            folder_deployed: Some("Base Cache/Deploy".into()),
            ..Profile::default()
        };
        assert!(ImportContext::from_profile("Hades", &profile, Some(&game.game_dir())).is_err());
    }
}
