//! Error types for modimp-core

use modimp_fs::NormalizedPath;

/// Result type for modimp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in modimp-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The game has no content folder where one was expected
    #[error("The folder '{path}' does not exist; check 'game_dir_path' in the profile")]
    ScopeMissing { path: NormalizedPath },

    /// The deployment folder is not inside the content folder
    #[error("Deployment folder '{deploy}' is not a subfolder of '{scope}'; configure 'folder_deployed' to be within the content")]
    DeployOutOfScope {
        deploy: NormalizedPath,
        scope: NormalizedPath,
    },

    /// No profile with this name is configured
    #[error("No profile named '{name}' is configured; add it under 'profiles' or pick one with --profile")]
    ProfileNotFound { name: String },

    /// A payload was applied whose backing capability is missing
    #[error("{keyword} payloads are not available")]
    PayloadUnavailable { keyword: String },

    /// A payload record carried no source files
    #[error("{keyword} payload for {target} has no source")]
    MissingSource { keyword: String, target: String },

    /// The external package patcher failed
    #[error("Package patch failed: {message}")]
    PackagePatch { message: String },

    /// Applying mods to a target failed; the target was reverted
    #[error("Failed to apply mods to '{target}'; its changes were reverted")]
    HandlerFailed {
        target: String,
        #[source]
        source: Box<Error>,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from modimp-fs
    #[error(transparent)]
    Fs(#[from] modimp_fs::Error),

    /// Content error from modimp-content
    #[error(transparent)]
    Content(#[from] modimp_content::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
