//! Error types for modimp-content

/// Result type for modimp-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in modimp-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("{format} support is not available in this build")]
    FormatUnavailable { format: String },

    #[error(transparent)]
    Fs(#[from] modimp_fs::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }
}
