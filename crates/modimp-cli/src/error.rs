//! Error types for modimp-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from modimp-core
    #[error(transparent)]
    Core(#[from] modimp_core::Error),

    /// Error from modimp-fs
    #[error(transparent)]
    Fs(#[from] modimp_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed `--special-set` value
    #[error("Invalid --special-set value: {0}")]
    SpecialSet(#[from] serde_json::Error),

    /// Logging could not be set up
    #[error("Failed to set up logging: {0}")]
    Logging(String),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
