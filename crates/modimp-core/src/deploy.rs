//! Staging of mod payload files into the game-visible deploy folder

use indexmap::IndexMap;
use modimp_fs::io;
use tracing::debug;

use crate::Result;
use crate::context::ImportContext;
use crate::registry::DeployConfig;

/// Mod files to copy into the deploy folder, keyed by their path relative
/// to the mods folder.
#[derive(Debug, Default)]
pub struct DeployQueue {
    files: IndexMap<String, DeployConfig>,
}

impl DeployQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a file; registering it again merges the config.
    pub fn register(&mut self, mods_relative: impl Into<String>, config: &DeployConfig) {
        let entry = self.files.entry(mods_relative.into()).or_default();
        entry.extend(config.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn contains(&self, mods_relative: &str) -> bool {
        self.files.contains_key(mods_relative)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeployConfig)> {
        self.files.iter().map(|(path, config)| (path.as_str(), config))
    }

    /// Copy every queued file from the mods folder into the deploy folder,
    /// keeping relative paths.
    pub fn stage(&self, ctx: &ImportContext) -> Result<usize> {
        for relative in self.files.keys() {
            let from = ctx.mods_dir.join(relative);
            let to = ctx.deployed_path(relative);
            debug!(from = %from, to = %to, "deploying");
            io::copy_file(&from, &to)?;
        }
        Ok(self.files.len())
    }
}
