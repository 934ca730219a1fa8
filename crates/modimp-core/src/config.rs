//! Importer configuration and game profiles
//!
//! The configuration file is loaded through [`modimp_fs::ConfigStore`], so
//! TOML, JSON and YAML files are all accepted. Every field has a default and
//! a missing file is equivalent to an empty one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "modimp.toml";

/// Name reported for the special profile
pub const SPECIAL_PROFILE: &str = "special";

/// Folder settings for one game
///
/// Unset fields fall back to the importer defaults when the import context is
/// built. Relative folders are resolved against the game's content folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Target files used when a directive file has no active `To`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target: Option<Vec<String>>,
    /// Game directory, relative to the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_dir_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_deployed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_mods: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_basecache: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_editcache: Option<String>,
    /// External command used for `Package Patch` payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_patcher: Option<String>,
}

impl Profile {
    pub fn with_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_target: Some(targets.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Overlay the fields set in `other` onto this profile.
    pub fn merge(&mut self, other: &Profile) {
        fn take(slot: &mut Option<String>, value: &Option<String>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        if other.default_target.is_some() {
            self.default_target.clone_from(&other.default_target);
        }
        take(&mut self.game_dir_path, &other.game_dir_path);
        take(&mut self.folder_deployed, &other.folder_deployed);
        take(&mut self.folder_mods, &other.folder_mods);
        take(&mut self.folder_basecache, &other.folder_basecache);
        take(&mut self.folder_editcache, &other.folder_editcache);
        take(&mut self.package_patcher, &other.package_patcher);
    }
}

/// Profiles shipped with the importer, keyed by the game's folder name.
pub fn builtin_profiles() -> IndexMap<String, Profile> {
    IndexMap::from([
        (
            "Hades".to_string(),
            Profile::with_targets(["Scripts/RoomManager.lua"]),
        ),
        (
            "Pyre".to_string(),
            Profile::with_targets(["Scripts/Campaign.lua", "Scripts/MPScripts.lua"]),
        ),
        (
            "Transistor".to_string(),
            Profile::with_targets(["Scripts/AllCampaignScripts.txt"]),
        ),
        ("Bastion".to_string(), Profile::default()),
    ])
}

/// Top-level importer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Print progress lines to the console
    pub echo: bool,
    /// Write a log file for each run
    pub log: bool,
    pub log_folder: String,
    pub log_prefix: String,
    pub log_suffix: String,
    /// Digest algorithms used for edit-cache fingerprints
    pub hashes: Vec<String>,
    /// Active profile; the game's folder name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub profile_special: Profile,
    pub profiles: IndexMap<String, Profile>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            echo: true,
            log: true,
            log_folder: "Logs".to_string(),
            log_prefix: "log-modimp ".to_string(),
            log_suffix: ".txt".to_string(),
            hashes: vec!["md5".to_string()],
            profile: None,
            profile_special: Profile::default(),
            profiles: builtin_profiles(),
        }
    }
}

impl ImporterConfig {
    /// Pick the profile for this run.
    ///
    /// `special` selects `profile_special`. Otherwise the name is taken from
    /// `requested`, then the configured `profile`, then `folder_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProfileNotFound`] if no profile has the chosen name.
    pub fn resolve_profile(
        &self,
        special: bool,
        requested: Option<&str>,
        folder_name: &str,
    ) -> Result<(String, Profile)> {
        if special {
            return Ok((SPECIAL_PROFILE.to_string(), self.profile_special.clone()));
        }

        let name = requested
            .or(self.profile.as_deref())
            .unwrap_or(folder_name);
        self.profiles
            .get(name)
            .map(|profile| (name.to_string(), profile.clone()))
            .ok_or_else(|| Error::ProfileNotFound {
                name: name.to_string(),
            })
    }
}
